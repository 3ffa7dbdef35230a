// Error type shared by every engine operation.
//
// All failures are fail-fast: construction either yields a complete set or
// an error, and transposition validates before it mutates anything, so a
// caller never observes a half-built or half-transposed set.
//
// The variants group into four kinds (see `ErrorKind`): bad caller input,
// dynamic type mismatches, consistency violations between linked sets, and
// configuration parse failures.

use crate::factors::FactorKey;
use thiserror::Error;

/// Coarse classification of a `CpsError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    TypeMismatch,
    /// Two sets that must agree (parent/child slot layout, shared reference
    /// tone) do not.
    Consistency,
    Config,
}

#[derive(Debug, Error)]
pub enum CpsError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// A child element's factor tuple has no slot in its parent. Indicates an
    /// embedding whose factor space is not contained in the parent's.
    #[error("factor tuple {key} has no slot in parent '{parent}'")]
    MissingParentSlot { key: FactorKey, parent: String },

    #[error("set '{set}' is at 1/1 = {found}, expected a shared 1/1 = {expected}")]
    ReferenceMismatch {
        set: String,
        expected: String,
        found: String,
    },

    #[error("config parse failed: {0}")]
    Config(#[from] serde_json::Error),
}

impl CpsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CpsError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            CpsError::TypeMismatch(_) => ErrorKind::TypeMismatch,
            CpsError::MissingParentSlot { .. } | CpsError::ReferenceMismatch { .. } => {
                ErrorKind::Consistency
            }
            CpsError::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CpsError::InvalidArgument(msg.into())
    }
}
