use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::EvalError;

/// Runtime value produced while walking a condition's expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(Decimal),
    Bool(bool),
    Date(DateTime<Utc>),
}

impl Value {
    /// Strict equality: same-type scalars compare by value, operands of
    /// different types compare unequal rather than erroring. Dates only
    /// participate in conditions through helpers, so they are never equal
    /// here.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Num(a), Value::Num(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => false,
        }
    }

    /// Ordering comparison, defined for numbers only.
    pub fn compare(&self, other: &Value) -> Result<Ordering, EvalError> {
        match (self, other) {
            (Value::Num(a), Value::Num(b)) => Ok(a.cmp(b)),
            _ => Err(EvalError::NonNumericOrdering),
        }
    }

    /// Truthiness of a condition's final value: empty strings and zero are
    /// falsy, matching how the rule language has always coerced results.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Num(n) => !n.is_zero(),
            Value::Bool(b) => *b,
            Value::Date(_) => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_eq_same_types() {
        assert!(Value::Str("a".into()).strict_eq(&Value::Str("a".into())));
        // 5.00 and 5 are the same number regardless of scale.
        assert!(Value::Num(Decimal::new(500, 2)).strict_eq(&Value::Num(Decimal::new(5, 0))));
    }

    #[test]
    fn strict_eq_mismatched_types_is_false() {
        assert!(!Value::Num(Decimal::new(5, 0)).strict_eq(&Value::Str("5".into())));
        assert!(!Value::Bool(true).strict_eq(&Value::Num(Decimal::ONE)));
    }

    #[test]
    fn ordering_on_numbers() {
        let five = Value::Num(Decimal::new(5, 0));
        let ten = Value::Num(Decimal::new(10, 0));
        assert_eq!(five.compare(&ten).unwrap(), Ordering::Less);
    }

    #[test]
    fn ordering_on_strings_is_a_fault() {
        let a = Value::Str("a".into());
        let b = Value::Str("b".into());
        assert_eq!(a.compare(&b), Err(EvalError::NonNumericOrdering));
    }

    #[test]
    fn truthiness() {
        assert!(Value::Str("x".into()).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(Value::Num(Decimal::ONE).is_truthy());
        assert!(!Value::Num(Decimal::ZERO).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
    }
}
