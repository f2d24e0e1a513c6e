use std::io::Write;

use crate::ast::*;
use crate::error::{Error, Result, SourceLocation};
use crate::value::{Arith, Value, arithmetic};

use super::{Builtin, Runtime};

/// Result of executing a statement
pub(crate) enum StmtResult {
    Normal,
    /// A `break` is unwinding toward the nearest enclosing for loop
    Break(SourceLocation),
}

impl Runtime {
    pub(crate) fn execute_statements<W: Write>(&mut self, statements: &[Stmt], output: &mut W) -> Result<StmtResult> {
        for stmt in statements {
            match self.execute_stmt(stmt, output)? {
                StmtResult::Normal => continue,
                other => return Ok(other),
            }
        }
        Ok(StmtResult::Normal)
    }

    pub(crate) fn execute_stmt<W: Write>(&mut self, stmt: &Stmt, output: &mut W) -> Result<StmtResult> {
        match stmt {
            Stmt::Print { args, .. } => {
                self.execute_print(args, output)?;
                Ok(StmtResult::Normal)
            }

            Stmt::Assign { name, op, value, .. } => {
                self.execute_assign(name, *op, value)?;
                Ok(StmtResult::Normal)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.eval_expr(condition)?.is_truthy() {
                    self.execute_statements(then_branch, output)
                } else if let Some(else_branch) = else_branch {
                    self.execute_statements(else_branch, output)
                } else {
                    Ok(StmtResult::Normal)
                }
            }

            Stmt::For {
                init,
                condition,
                update,
                body,
                ..
            } => {
                if let Some(init_stmt) = init {
                    self.execute_stmt(init_stmt, output)?;
                }

                loop {
                    if let Some(cond_expr) = condition
                        && !self.eval_expr(cond_expr)?.is_truthy()
                    {
                        break;
                    }

                    // A break ends this loop before the update runs
                    match self.execute_statements(body, output)? {
                        StmtResult::Normal => {}
                        StmtResult::Break(_) => break,
                    }

                    if let Some(update_stmt) = update {
                        self.execute_stmt(update_stmt, output)?;
                    }
                }
                Ok(StmtResult::Normal)
            }

            Stmt::Break { location } => Ok(StmtResult::Break(*location)),

            Stmt::Increment { name, op, .. } => {
                self.execute_increment(name, *op)?;
                Ok(StmtResult::Normal)
            }

            // No new scope: variables are global
            Stmt::Block(block) => self.execute_statements(&block.statements, output),
        }
    }

    /// Evaluate every argument, join with OFS, end with ORS, write once
    fn execute_print<W: Write>(&mut self, args: &[Expr], output: &mut W) -> Result<()> {
        let values = args
            .iter()
            .map(|e| self.eval_expr(e).map(|v| v.to_string_val()))
            .collect::<Result<Vec<String>>>()?;

        let ofs = self.env.builtin(Builtin::Ofs).to_string_val();
        let ors = self.env.builtin(Builtin::Ors).to_string_val();

        let mut line = values.join(&ofs);
        line.push_str(&ors);
        output.write_all(line.as_bytes())?;
        Ok(())
    }

    fn execute_assign(&mut self, name: &str, op: AssignOp, value: &Expr) -> Result<()> {
        let rhs = self.eval_expr(value)?;

        let new_value = match op.arith() {
            None => rhs,
            Some(arith) => {
                let current = self.env.lookup(name).cloned().unwrap_or_default();
                arithmetic(arith, &current, &rhs)?
            }
        };

        self.env.set(name, new_value);
        Ok(())
    }

    fn execute_increment(&mut self, name: &str, op: IncrementOp) -> Result<()> {
        let step = match op {
            IncrementOp::Increment => 1,
            IncrementOp::Decrement => -1,
        };

        let new_value = match self.env.lookup(name) {
            None => Value::Integer(step),
            Some(current) if current.is_numeric() => arithmetic(Arith::Add, current, &Value::Integer(step))?,
            Some(other) => {
                return Err(Error::RuntimeType {
                    name: name.to_string(),
                    found: other.to_string_val(),
                });
            }
        };

        self.env.set(name, new_value);
        Ok(())
    }
}
