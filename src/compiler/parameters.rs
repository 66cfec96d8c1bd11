//! Caller-facing compile configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one compile call.
///
/// `compiler_options` is a raw string forwarded to the downstream compiler
/// verbatim, except for two switches this pipeline consumes itself:
/// `/nocode` and `/checktypes` (optional trailing `+`, case-insensitive).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerParameters {
    /// Target language identifier. Must not be empty.
    pub language: String,
    /// Where to put the produced assembly; `None` together with
    /// `generate_in_memory` means "deliver bytes only".
    pub output_assembly: Option<PathBuf>,
    /// Reference assembly paths, ordered. An entry whose file stem is
    /// `corelib` is special-cased during reference resolution.
    pub references: Vec<PathBuf>,
    /// Embedded/linked resource paths, forwarded untouched.
    pub resources: Vec<PathBuf>,
    pub include_debug_information: bool,
    pub optimize: bool,
    pub treat_warnings_as_errors: bool,
    /// Skip writing the assembly to a caller-visible path; allocate a temp
    /// path, load the bytes, delete the file.
    pub generate_in_memory: bool,
    /// Stop after generation and return the merged compile unit.
    pub generate_code_compile_unit_only: bool,
    /// Reject inline code blocks found in the markup.
    pub compile_with_no_code: bool,
    /// Enable the stricter authorized-type validation pass.
    pub check_types: bool,
    /// Prefix applied to every generated type's namespace.
    pub root_namespace: String,
    /// Raw extra compiler flags; see the switch note above.
    pub compiler_options: String,
    /// Target-framework tag selecting the downstream front end.
    pub compiler_version: Option<String>,
}

impl CompilerParameters {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            output_assembly: None,
            references: Vec::new(),
            resources: Vec::new(),
            include_debug_information: false,
            optimize: false,
            treat_warnings_as_errors: false,
            generate_in_memory: false,
            generate_code_compile_unit_only: false,
            compile_with_no_code: false,
            check_types: false,
            root_namespace: String::new(),
            compiler_options: String::new(),
            compiler_version: None,
        }
    }
}

/// The pipeline's own switches, extracted from a raw options string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct OptionSwitches {
    pub no_code: bool,
    pub check_types: bool,
}

/// Splits the recognized switches out of `raw`, returning the remainder to
/// forward downstream unchanged.
pub(crate) fn extract_switches(raw: &str) -> (String, OptionSwitches) {
    let mut switches = OptionSwitches::default();
    let mut forwarded = Vec::new();
    for token in raw.split_whitespace() {
        let bare = token.strip_suffix('+').unwrap_or(token);
        if bare.eq_ignore_ascii_case("/nocode") {
            switches.no_code = true;
        } else if bare.eq_ignore_ascii_case("/checktypes") {
            switches.check_types = true;
        } else {
            forwarded.push(token);
        }
    }
    (forwarded.join(" "), switches)
}
