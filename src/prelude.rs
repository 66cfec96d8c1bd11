//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need: the compiler entry point, its
//! parameter/result model, and the collaborator traits.

// Orchestration entry point
pub use crate::compiler::{CompilerParameters, WorkflowCompiler, WorkflowCompilerBuilder};

// Result and diagnostic model
pub use crate::results::{codes, CompilerError, CompilerResults};

// Activity tree and markup loading
pub use crate::markup::{ActivityNode, MarkupDocumentLoader, XOML_EXTENSION};

// Code generation output
pub use crate::codegen::{CompileUnit, MemberDecl, NamespaceDecl, TypeDecl};

// Collaborator seams
pub use crate::backend::{
    DefaultLanguageService, LanguageService, RawDiagnostic, SourceCompilation, SourceCompiler,
    SourceCompilerOutput,
};
pub use crate::resolve::{ReferenceIndex, TypeDescriptor, TypeResolver};

// Error types
pub use crate::error::{ContractError, MarkupError};

// Standard library re-exports commonly used with this crate
pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;
