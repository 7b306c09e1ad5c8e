use thiserror::Error;

/// Rejection of condition text that falls outside the rule grammar.
/// Compilation failures are deterministic for a given source text; the
/// evaluator treats them as "this rule never matches".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    #[error("unknown operator `{0}`")]
    UnknownOperator(String),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated regex literal")]
    UnterminatedRegex,
    #[error("invalid number literal `{0}`")]
    InvalidNumber(String),
    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(String),
    #[error("`transaction` has no field `{0}`")]
    UnknownField(String),
    #[error("unknown method `.{0}()`")]
    UnknownMethod(String),
    #[error("unsupported regex flag `{0}`")]
    UnsupportedRegexFlag(char),
    #[error("invalid regex: {0}")]
    InvalidRegex(String),
    #[error("expected {expected}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: String,
    },
    #[error("unexpected end of condition, expected {0}")]
    UnexpectedEnd(&'static str),
    #[error("condition is empty")]
    EmptyCondition,
    #[error("condition nesting exceeds the depth limit")]
    TooDeep,
}

/// Runtime fault inside a successfully compiled predicate, raised against a
/// particular transaction. The evaluator converts these to a non-match.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("ordering comparison requires numeric operands")]
    NonNumericOrdering,
    #[error("`.includes()` requires string operands")]
    IncludesOnNonString,
    #[error("regex `.test()` requires a string operand")]
    RegexOnNonString,
    #[error("{0}() requires a date argument")]
    HelperOnNonDate(&'static str),
}
