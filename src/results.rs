//! Diagnostic and result types shared by every pipeline stage.
//!
//! Stages never throw structured errors; they append [`CompilerError`]
//! values to the single [`CompilerResults`] collection and return normally.
//! The append order is detection order and is never resorted.

use crate::codegen::CompileUnit;
use crate::error::MarkupError;
use std::path::PathBuf;

/// Error codes emitted by the pipeline itself. Downstream compiler
/// diagnostics keep their own codes where the backend supplies one.
pub mod codes {
    pub const MARKUP_PARSE: &str = "TL0100";
    pub const UNRESOLVED_TYPE: &str = "TL0102";
    pub const DUPLICATE_IDENTIFIER: &str = "TL0110";
    pub const INVALID_IDENTIFIER: &str = "TL0111";
    pub const TYPE_NOT_AUTHORIZED: &str = "TL0112";
    pub const MISSING_CLASS: &str = "TL0120";
    pub const INLINE_CODE_FORBIDDEN: &str = "TL0121";
    pub const SOURCE_COMPILER: &str = "TL0130";
    pub const UNKNOWN_EXCEPTION: &str = "TL0199";
}

/// One diagnostic produced anywhere in the pipeline.
///
/// Lines and columns are 1-based, or `-1` when unknown. `property_name`
/// links the diagnostic to a specific attribute on an activity node
/// (for example the `Name` attribute for identifier errors).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerError {
    pub file: String,
    pub line: i32,
    pub column: i32,
    pub code: String,
    pub message: String,
    pub is_warning: bool,
    pub property_name: Option<String>,
}

impl CompilerError {
    /// A whole-batch error with no file or position attribution.
    pub fn unattributed(code: &str, message: impl Into<String>) -> Self {
        Self {
            file: String::new(),
            line: -1,
            column: -1,
            code: code.to_string(),
            message: message.into(),
            is_warning: false,
            property_name: None,
        }
    }

    /// An error attributed to a file but no position within it.
    pub fn for_file(file: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            file: file.to_string(),
            ..Self::unattributed(code, message)
        }
    }

    /// An error with a full 1-based source position.
    pub fn at(file: &str, line: i32, column: i32, code: &str, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            ..Self::for_file(file, code, message)
        }
    }

    pub fn with_property(mut self, property: &str) -> Self {
        self.property_name = Some(property.to_string());
        self
    }

    pub fn as_warning(mut self) -> Self {
        self.is_warning = true;
        self
    }

    /// Wraps a markup deserialization failure, re-incrementing the
    /// zero-based position stored inside [`MarkupError`] back to 1-based.
    pub fn from_markup(file: &str, error: &MarkupError) -> Self {
        let code = match error {
            MarkupError::UnresolvedType { .. } => codes::UNRESOLVED_TYPE,
            _ => codes::MARKUP_PARSE,
        };
        match error.position() {
            Some((line, column)) => Self::at(
                file,
                line as i32 + 1,
                column as i32 + 1,
                code,
                error.to_string(),
            ),
            None => Self::for_file(file, code, error.to_string()),
        }
    }
}

impl std::fmt::Display for CompilerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = if self.is_warning { "warning" } else { "error" };
        if self.line >= 0 {
            write!(
                f,
                "{}({},{}): {} {}: {}",
                self.file, self.line, self.column, severity, self.code, self.message
            )
        } else if !self.file.is_empty() {
            write!(
                f,
                "{}: {} {}: {}",
                self.file, severity, self.code, self.message
            )
        } else {
            write!(f, "{} {}: {}", severity, self.code, self.message)
        }
    }
}

/// The final output of one compile call.
#[derive(Debug, Default)]
pub struct CompilerResults {
    /// All diagnostics, in detection order.
    pub errors: Vec<CompilerError>,
    /// The merged compile unit; populated only when
    /// `generate_code_compile_unit_only` was requested.
    pub compile_unit: Option<CompileUnit>,
    /// Path to the produced assembly, when an output path was given.
    pub assembly_path: Option<PathBuf>,
    /// The assembly bytes, when `generate_in_memory` was requested.
    pub assembly_bytes: Option<Vec<u8>>,
    /// Every temporary path created during the call. Cleanup deletes
    /// these best-effort once the isolated session has terminated.
    pub temp_files: Vec<PathBuf>,
}

impl CompilerResults {
    /// True iff at least one entry is a genuine error (not a warning).
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| !e.is_warning)
    }

    pub fn push(&mut self, error: CompilerError) {
        self.errors.push(error);
    }

    /// True if any error so far is attributed to the given file.
    pub fn file_has_errors(&self, file: &str) -> bool {
        self.errors.iter().any(|e| !e.is_warning && e.file == file)
    }
}
