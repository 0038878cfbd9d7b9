//! Error types for Kindred Core

use thiserror::Error;

use crate::diagnostics::Diagnostic;

/// Result type alias using Kindred's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Kindred error types
///
/// Queries over a snapshot never fail; these errors are produced only by the
/// strict entry points and by snapshot parsing.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    #[error("Snapshot contains no members")]
    EmptySnapshot,

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(Diagnostic),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
