use regex::Regex;
use rust_decimal::Decimal;

/// Transaction fields addressable from a condition as `transaction.<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Merchant,
    Amount,
    Date,
    Account,
    Category,
}

impl Field {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "merchant" => Some(Field::Merchant),
            "amount" => Some(Field::Amount),
            "date" => Some(Field::Date),
            "account" => Some(Field::Account),
            "category" => Some(Field::Category),
            _ => None,
        }
    }
}

/// Date helpers callable from a condition, all computed on the UTC calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    DayOfWeek,
    Month,
    Year,
    Day,
    IsWeekend,
    WeekNumber,
}

impl Helper {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "dayOfWeek" => Some(Helper::DayOfWeek),
            "month" => Some(Helper::Month),
            "year" => Some(Helper::Year),
            "day" => Some(Helper::Day),
            "isWeekend" => Some(Helper::IsWeekend),
            "getWeekNumber" => Some(Helper::WeekNumber),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Helper::DayOfWeek => "dayOfWeek",
            Helper::Month => "month",
            Helper::Year => "year",
            Helper::Day => "day",
            Helper::IsWeekend => "isWeekend",
            Helper::WeekNumber => "getWeekNumber",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

/// Typed expression tree for a compiled condition. Every construct the
/// grammar admits is enumerated here; evaluation is a walk over this tree,
/// so nothing outside these operations can execute.
#[derive(Debug, Clone)]
pub enum Expr {
    StringLit(String),
    NumberLit(Decimal),
    BoolLit(bool),
    Field(Field),
    HelperCall { helper: Helper, arg: Box<Expr> },
    Comparison { op: CmpOp, lhs: Box<Expr>, rhs: Box<Expr> },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Includes { target: Box<Expr>, needle: Box<Expr> },
    RegexMatch { regex: Regex, target: Box<Expr> },
}
