use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Text that reads as a number: optional sign, digits, optional fraction
static NUMERIC_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+(?:\.[0-9]*)?$").expect("valid numeric pattern"));

/// Dynamically typed scalar: an integer, a float, or text
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Str(String),
}

impl Default for Value {
    fn default() -> Self {
        Value::Integer(0)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Integer(i64::from(b))
    }
}

impl Value {
    /// Coerce a field token the way field access does: text containing a `.`
    /// becomes a float if it parses, otherwise an integer if it parses,
    /// otherwise it stays text.
    pub fn from_field(text: &str) -> Self {
        let trimmed = text.trim();
        if text.contains('.') {
            if let Ok(f) = trimmed.parse::<f64>() {
                return Value::Float(f);
            }
        } else if let Ok(n) = trimmed.parse::<i64>() {
            return Value::Integer(n);
        }
        Value::Str(text.to_string())
    }

    /// Check if this value is "true" in boolean context
    /// - Numbers are true when nonzero
    /// - Text is true when non-empty
    #[inline]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
        }
    }

    /// True for integers and floats (not for numeric-looking text)
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// The numeric form of this value, if it has one. Numeric-looking text
    /// is coerced; any other text has none.
    pub fn to_number(&self) -> Option<Number> {
        match self {
            Value::Integer(n) => Some(Number::Int(*n)),
            Value::Float(n) => Some(Number::Float(*n)),
            Value::Str(s) => parse_numeric_text(s),
        }
    }

    /// Display text, as used by print
    pub fn to_string_val(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", format_number(*n)),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// A value already known to be numeric
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(n) => n,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Value::Integer(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

/// Check whether text looks like a number (surrounding whitespace ignored)
pub fn is_numeric_text(s: &str) -> bool {
    NUMERIC_TEXT.is_match(s.trim())
}

fn parse_numeric_text(s: &str) -> Option<Number> {
    if !is_numeric_text(s) {
        return None;
    }
    let trimmed = s.trim();
    if trimmed.contains('.') {
        trimmed.parse().ok().map(Number::Float)
    } else {
        match trimmed.parse::<i64>() {
            Ok(n) => Some(Number::Int(n)),
            Err(_) => trimmed.parse().ok().map(Number::Float),
        }
    }
}

/// Arithmetic operators shared by binary expressions and compound assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arith {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl Arith {
    pub fn symbol(self) -> &'static str {
        match self {
            Arith::Add => "+",
            Arith::Sub => "-",
            Arith::Mul => "*",
            Arith::Div => "/",
            Arith::Mod => "%",
        }
    }
}

/// Apply an arithmetic operator. Both operands must be numeric or
/// numeric-looking text.
pub fn arithmetic(op: Arith, left: &Value, right: &Value) -> Result<Value> {
    let l = numeric_operand(op.symbol(), left)?;
    let r = numeric_operand(op.symbol(), right)?;

    if matches!(op, Arith::Div | Arith::Mod) && r.as_f64() == 0.0 {
        let cause = if op == Arith::Div { "division by zero" } else { "modulo by zero" };
        return Err(Error::operator(op.symbol(), cause));
    }

    let result = match (l, r) {
        (Number::Int(a), Number::Int(b)) => match op {
            Arith::Add => a.checked_add(b).map(Number::Int),
            Arith::Sub => a.checked_sub(b).map(Number::Int),
            Arith::Mul => a.checked_mul(b).map(Number::Int),
            Arith::Div => Some(Number::Float(a as f64 / b as f64)),
            Arith::Mod => a.checked_rem(b).map(Number::Int),
        }
        // Integer overflow promotes to float
        .unwrap_or_else(|| Number::Float(float_op(op, a as f64, b as f64))),
        (a, b) => Number::Float(float_op(op, a.as_f64(), b.as_f64())),
    };

    Ok(result.into())
}

fn float_op(op: Arith, a: f64, b: f64) -> f64 {
    match op {
        Arith::Add => a + b,
        Arith::Sub => a - b,
        Arith::Mul => a * b,
        Arith::Div => a / b,
        Arith::Mod => a % b,
    }
}

/// Arithmetic negation
pub fn negate(operand: &Value) -> Result<Value> {
    let value = match numeric_operand("-", operand)? {
        Number::Int(n) => n.checked_neg().map(Value::Integer).unwrap_or(Value::Float(-(n as f64))),
        Number::Float(n) => Value::Float(-n),
    };
    Ok(value)
}

fn numeric_operand(symbol: &'static str, value: &Value) -> Result<Number> {
    value.to_number().ok_or_else(|| {
        Error::operator(symbol, format!("non-numeric operand \"{}\"", value))
    })
}

/// Compare two values.
///
/// Two numbers compare numerically, as does a number against numeric-looking
/// text. Every other pairing compares the display text of both sides.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    let numeric = match (left, right) {
        (Value::Str(_), Value::Str(_)) => None,
        _ if left.is_numeric() || right.is_numeric() => left.to_number().zip(right.to_number()),
        _ => None,
    };

    match numeric {
        Some((Number::Int(a), Number::Int(b))) => a.cmp(&b),
        Some((a, b)) => a.as_f64().partial_cmp(&b.as_f64()).unwrap_or(Ordering::Equal),
        None => left.to_string_val().cmp(&right.to_string_val()),
    }
}

/// Format a float for output. Integral values print without a fraction,
/// everything else like C's `%.6g`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }

    // Rounding to six significant digits can carry into the exponent, so
    // take the exponent from the rounded scientific form
    let sci = format!("{:.5e}", n);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if !(-4..6).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (5 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, n)).to_string()
    }
}

/// Drop trailing zeros after the decimal point, and the point itself
fn trim_fraction(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0');
    trimmed.strip_suffix('.').unwrap_or(trimmed)
}
