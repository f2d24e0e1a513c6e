use crate::ast::*;
use crate::error::Result;
use crate::value::{Arith, Value, arithmetic, compare_values, negate};

use super::Runtime;

impl Runtime {
    /// Evaluate an expression. Expressions never mutate state.
    pub(crate) fn eval_expr(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(value, _) => Ok(value.clone()),

            Expr::Var(name, _) => Ok(self.env.get(name)),

            Expr::Field(index, _) => {
                let index = self.eval_expr(index)?;
                Ok(self.get_field(&index))
            }

            Expr::Binary { left, op, right, .. } => {
                // Both sides are always evaluated, && and || included
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                eval_binary_op(*op, l, r)
            }

            Expr::Unary { op, operand, .. } => {
                let value = self.eval_expr(operand)?;
                match op {
                    UnaryOp::Neg => negate(&value),
                    UnaryOp::Not => Ok(Value::from(!value.is_truthy())),
                }
            }
        }
    }

    /// `$index`: 0 is the whole record, 1..=NF a coerced field, anything
    /// else empty text. Text indexes must be all digits.
    fn get_field(&self, index: &Value) -> Value {
        let index = match index {
            Value::Integer(n) => usize::try_from(*n).ok(),
            Value::Float(f) if *f >= 0.0 => Some(f.trunc() as usize),
            Value::Float(_) => None,
            Value::Str(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s.parse().ok(),
            Value::Str(_) => None,
        };

        match index {
            Some(0) => Value::Str(self.record.line.clone()),
            Some(i) if i <= self.record.fields.len() => Value::from_field(&self.record.fields[i - 1]),
            _ => Value::Str(String::new()),
        }
    }
}

fn eval_binary_op(op: BinaryOp, l: Value, r: Value) -> Result<Value> {
    let value = match op {
        BinaryOp::Add => arithmetic(Arith::Add, &l, &r)?,
        BinaryOp::Sub => arithmetic(Arith::Sub, &l, &r)?,
        BinaryOp::Mul => arithmetic(Arith::Mul, &l, &r)?,
        BinaryOp::Div => arithmetic(Arith::Div, &l, &r)?,
        BinaryOp::Mod => arithmetic(Arith::Mod, &l, &r)?,
        BinaryOp::Lt => Value::from(compare_values(&l, &r).is_lt()),
        BinaryOp::Le => Value::from(compare_values(&l, &r).is_le()),
        BinaryOp::Gt => Value::from(compare_values(&l, &r).is_gt()),
        BinaryOp::Ge => Value::from(compare_values(&l, &r).is_ge()),
        BinaryOp::Eq => Value::from(compare_values(&l, &r).is_eq()),
        BinaryOp::Ne => Value::from(compare_values(&l, &r).is_ne()),
        BinaryOp::And => {
            if l.is_truthy() {
                r
            } else {
                l
            }
        }
        BinaryOp::Or => {
            if l.is_truthy() {
                l
            } else {
                r
            }
        }
    };
    Ok(value)
}
