use crate::value::Value;
use thiserror::Error;

/// Why a range predicate's bounds were rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeFault {
    #[error("lower bound exceeds upper bound")]
    Inverted,
    #[error("bounds are not mutually orderable")]
    Unorderable,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredicateError {
    #[error("invalid range {op}({lo}, {hi}): {fault}")]
    InvalidRange {
        op: &'static str,
        lo: Value,
        hi: Value,
        fault: RangeFault,
    },
}
