//! Trait seams for the external collaborators: the downstream source
//! compiler and the target-language identifier rules.

use std::path::PathBuf;

/// One invocation of the downstream source compiler.
#[derive(Debug, Clone)]
pub struct SourceCompilation {
    /// Target language tag, passed through from the caller.
    pub language: String,
    /// Compiler-version / target-framework tag selecting the front end.
    pub compiler_version: Option<String>,
    /// The caller's extra options with the pipeline's own switches
    /// already stripped.
    pub options: String,
    pub references: Vec<PathBuf>,
    pub resources: Vec<PathBuf>,
    /// Generated and user-authored source files, in order.
    pub sources: Vec<PathBuf>,
    pub output_path: PathBuf,
    pub include_debug_information: bool,
    pub optimize: bool,
    pub treat_warnings_as_errors: bool,
}

/// A diagnostic in the downstream compiler's own shape. Positions are
/// zero-based here; wrapping into `CompilerError` applies the +1
/// convention.
#[derive(Debug, Clone)]
pub struct RawDiagnostic {
    pub file: String,
    pub line: i32,
    pub column: i32,
    pub code: String,
    pub message: String,
    pub is_warning: bool,
}

/// What one invocation produced: a binary, or diagnostics, or both
/// (warnings alongside a successful binary).
#[derive(Debug, Clone, Default)]
pub struct SourceCompilerOutput {
    pub binary: Option<PathBuf>,
    pub diagnostics: Vec<RawDiagnostic>,
}

/// The downstream general-purpose compiler, consumed as an opaque service.
pub trait SourceCompiler: Send + Sync {
    fn compile(&self, job: &SourceCompilation) -> SourceCompilerOutput;
}

/// Identifier rules of the target language.
pub trait LanguageService: Send + Sync {
    fn is_valid_identifier(&self, name: &str) -> bool;
}

/// Default identifier rules: leading letter or underscore, alphanumeric
/// or underscore afterwards, and not a reserved word.
pub struct DefaultLanguageService;

const RESERVED_WORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "event", "false", "finally", "float",
    "for", "foreach", "goto", "if", "in", "int", "interface", "internal", "is", "lock", "long",
    "namespace", "new", "null", "object", "out", "override", "private", "protected", "public",
    "readonly", "ref", "return", "sealed", "short", "static", "string", "struct", "switch",
    "this", "throw", "true", "try", "typeof", "uint", "ulong", "using", "virtual", "void",
    "while",
];

impl LanguageService for DefaultLanguageService {
    fn is_valid_identifier(&self, name: &str) -> bool {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !(first.is_alphabetic() || first == '_') {
            return false;
        }
        if !chars.all(|ch| ch.is_alphanumeric() || ch == '_') {
            return false;
        }
        !RESERVED_WORDS.contains(&name)
    }
}
