use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

const SNIPPET_LEN: usize = 32;

/// Bounded copy of the input at the point a decode failed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snippet(pub Vec<u8>);

impl Snippet {
    pub(crate) fn at(bytes: &[u8], offset: usize) -> Snippet {
        let start = offset.min(bytes.len());
        let end = (start + SNIPPET_LEN).min(bytes.len());
        Snippet(bytes[start..end].to_vec())
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.escape_ascii())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("unrecognized tag '{}' at offset {offset} near {snippet}", .tag.escape_ascii())]
    UnrecognizedTag { offset: usize, tag: u8, snippet: Snippet },

    #[error("malformed integer at offset {offset} near {snippet}")]
    MalformedInteger { offset: usize, snippet: Snippet },

    #[error("malformed string at offset {offset} near {snippet}")]
    MalformedString { offset: usize, snippet: Snippet },

    #[error("malformed container at offset {offset}: {reason} near {snippet}")]
    MalformedContainer { offset: usize, reason: &'static str, snippet: Snippet },

    #[error("duplicate dictionary key '{key}' at offset {offset}")]
    DuplicateKey { offset: usize, key: String },

    #[error("nesting deeper than {limit} levels at offset {offset}")]
    NestingTooDeep { offset: usize, limit: usize },
}

impl DecodeError {
    /// Offset into the decoded buffer where the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::UnexpectedEnd { offset }
            | DecodeError::UnrecognizedTag { offset, .. }
            | DecodeError::MalformedInteger { offset, .. }
            | DecodeError::MalformedString { offset, .. }
            | DecodeError::MalformedContainer { offset, .. }
            | DecodeError::DuplicateKey { offset, .. }
            | DecodeError::NestingTooDeep { offset, .. } => *offset,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum EncodeError {
    #[error("unsupported type: {type_name}")]
    UnsupportedType { type_name: &'static str },

    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Errors of the file and stream helpers in [`crate::api`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("'{}' doesn't exist or is unavailable", .0.display())]
    FilePath(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
