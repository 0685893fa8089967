use thiserror::Error;

/// `spec.md` §4.2 failure modes and §7's taxonomy row for marks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MarkError {
    #[error("mark sequence {0} is not chain-continuous with its predecessor")]
    SequenceBroken(u32),
    #[error("chain id mismatch between adjacent marks")]
    ChainIdMismatch,
    #[error("sequence regressed: expected {expected}, found {found}")]
    SeqRegression { expected: u32, found: u32 },
    #[error("date regressed relative to the predecessor mark")]
    DateRegression,
    #[error("malformed mark: {0}")]
    Malformed(String),
}
