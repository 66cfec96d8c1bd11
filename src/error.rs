use thiserror::Error;

/// Errors raised while deserializing a XOML document into an activity tree.
///
/// Positions inside this type are **zero-based**: the markup reader reports
/// 1-based line/column, the loader decrements both when it constructs the
/// error, and [`crate::results::CompilerError`] increments them again when
/// the error is surfaced to the caller. Both conversions must stay in place
/// for surfaced positions to line up with the source document. Display
/// re-applies the +1 as well, so the message text and the structured
/// position always name the same place.
#[derive(Error, Debug, Clone)]
pub enum MarkupError {
    #[error("Malformed markup at line {}, column {}: {message}", .line + 1, .column + 1)]
    Malformed {
        line: u32,
        column: u32,
        message: String,
    },

    #[error("Element '{element}' at line {}, column {} does not resolve to a known activity type", .line + 1, .column + 1)]
    UnresolvedType {
        element: String,
        line: u32,
        column: u32,
    },

    #[error("Attribute '{attribute}' on '{element}' at line {}, column {} is invalid: {message}", .line + 1, .column + 1)]
    InvalidAttribute {
        element: String,
        attribute: String,
        line: u32,
        column: u32,
        message: String,
    },

    #[error("Unexpected content inside '{element}' at line {}, column {}", .line + 1, .column + 1)]
    UnexpectedContent {
        element: String,
        line: u32,
        column: u32,
    },

    #[error("Failed to read markup file: {0}")]
    Io(String),
}

impl MarkupError {
    /// Builds a `Malformed` error from a 1-based reader position,
    /// converting to the zero-based internal convention.
    pub(crate) fn malformed_at(line: u32, column: u32, message: impl Into<String>) -> Self {
        MarkupError::Malformed {
            line: line.saturating_sub(1),
            column: column.saturating_sub(1),
            message: message.into(),
        }
    }

    /// The zero-based position carried by this error, if it has one.
    pub fn position(&self) -> Option<(u32, u32)> {
        match self {
            MarkupError::Malformed { line, column, .. }
            | MarkupError::UnresolvedType { line, column, .. }
            | MarkupError::InvalidAttribute { line, column, .. }
            | MarkupError::UnexpectedContent { line, column, .. } => Some((*line, *column)),
            MarkupError::Io(_) => None,
        }
    }
}

/// Argument-contract violations detected before any pipeline stage runs.
/// These are the only failures `WorkflowCompiler::compile` propagates as
/// a `Result::Err` instead of entries in the result's error list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("No input files were supplied")]
    NoInputFiles,

    #[error("CompilerParameters.language must not be empty")]
    MissingLanguage,
}
