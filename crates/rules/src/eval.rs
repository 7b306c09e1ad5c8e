use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::cmp::Ordering;

use reclass_core::Transaction;

use crate::ast::{CmpOp, Expr, Field, Helper};
use crate::error::EvalError;
use crate::helpers;
use crate::value::Value;

/// A compiled condition: a typed expression tree evaluated against one
/// transaction per call. The tree carries no per-call state, so one compiled
/// predicate serves any number of transactions, concurrently if needed.
#[derive(Debug, Clone)]
pub struct Predicate {
    expr: Expr,
}

impl Predicate {
    pub(crate) fn new(expr: Expr) -> Self {
        Predicate { expr }
    }

    /// Evaluate against one transaction. The transaction is never mutated;
    /// faults surface as errors, not panics.
    pub fn matches(&self, transaction: &Transaction) -> Result<bool, EvalError> {
        eval(&self.expr, transaction).map(|value| value.is_truthy())
    }
}

fn eval(expr: &Expr, tx: &Transaction) -> Result<Value, EvalError> {
    match expr {
        Expr::StringLit(s) => Ok(Value::Str(s.clone())),
        Expr::NumberLit(n) => Ok(Value::Num(*n)),
        Expr::BoolLit(b) => Ok(Value::Bool(*b)),
        Expr::Field(field) => Ok(field_value(*field, tx)),
        Expr::HelperCall { helper, arg } => match eval(arg, tx)? {
            Value::Date(date) => Ok(helper_value(*helper, date)),
            _ => Err(EvalError::HelperOnNonDate(helper.name())),
        },
        Expr::Comparison { op, lhs, rhs } => {
            let lhs = eval(lhs, tx)?;
            let rhs = eval(rhs, tx)?;
            let result = match op {
                CmpOp::Eq => lhs.strict_eq(&rhs),
                CmpOp::Ne => !lhs.strict_eq(&rhs),
                CmpOp::Gt => lhs.compare(&rhs)? == Ordering::Greater,
                CmpOp::Lt => lhs.compare(&rhs)? == Ordering::Less,
                CmpOp::Ge => lhs.compare(&rhs)? != Ordering::Less,
                CmpOp::Le => lhs.compare(&rhs)? != Ordering::Greater,
            };
            Ok(Value::Bool(result))
        }
        Expr::And(lhs, rhs) => {
            if !eval(lhs, tx)?.is_truthy() {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(eval(rhs, tx)?.is_truthy()))
        }
        Expr::Or(lhs, rhs) => {
            if eval(lhs, tx)?.is_truthy() {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(eval(rhs, tx)?.is_truthy()))
        }
        Expr::Includes { target, needle } => {
            let target = eval(target, tx)?;
            let needle = eval(needle, tx)?;
            match (target.as_str(), needle.as_str()) {
                (Some(haystack), Some(needle)) => Ok(Value::Bool(haystack.contains(needle))),
                _ => Err(EvalError::IncludesOnNonString),
            }
        }
        Expr::RegexMatch { regex, target } => match eval(target, tx)?.as_str() {
            Some(s) => Ok(Value::Bool(regex.is_match(s))),
            None => Err(EvalError::RegexOnNonString),
        },
    }
}

fn field_value(field: Field, tx: &Transaction) -> Value {
    match field {
        Field::Merchant => Value::Str(tx.merchant.clone()),
        Field::Amount => Value::Num(tx.amount),
        Field::Date => Value::Date(tx.date),
        Field::Account => Value::Str(tx.account.clone()),
        Field::Category => Value::Str(tx.category.clone()),
    }
}

fn helper_value(helper: Helper, date: DateTime<Utc>) -> Value {
    match helper {
        Helper::DayOfWeek => Value::Num(Decimal::from(helpers::day_of_week(date))),
        Helper::Month => Value::Num(Decimal::from(helpers::month(date))),
        Helper::Year => Value::Num(Decimal::from(helpers::year(date))),
        Helper::Day => Value::Num(Decimal::from(helpers::day(date))),
        Helper::IsWeekend => Value::Bool(helpers::is_weekend(date)),
        Helper::WeekNumber => Value::Num(Decimal::from(helpers::week_number(date))),
    }
}
