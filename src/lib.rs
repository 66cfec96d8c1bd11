//! # Telar - Workflow Markup Compiler
//!
//! **Telar** compiles declarative workflow markup (XOML) together with
//! user-authored source files into a buildable unit. The pipeline parses
//! each markup document into an activity tree, validates identifier
//! uniqueness and well-formedness, generates a source-level compile unit,
//! and hands the result to a pluggable downstream source compiler -
//! first for a throwaway local assembly, then for the caller's final
//! output. Every stage reports into one ordered diagnostic list, so a
//! batch of files yields all of its problems in a single pass.
//!
//! ## Core Workflow
//!
//! 1. **Describe the inputs**: build a [`compiler::CompilerParameters`]
//!    with the target language, references and flags, and collect the
//!    input paths (`.xoml` markup plus plain source files).
//! 2. **Plug in the collaborators**: implement
//!    [`backend::SourceCompiler`] for whatever compiler produces your
//!    binaries (and optionally [`backend::LanguageService`] for its
//!    identifier rules).
//! 3. **Compile**: call [`compiler::WorkflowCompiler::compile`] and check
//!    [`results::CompilerResults::has_errors`] before trusting the
//!    produced assembly or compile unit.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use telar::prelude::*;
//!
//! struct MyCompiler;
//!
//! impl SourceCompiler for MyCompiler {
//!     fn compile(&self, job: &SourceCompilation) -> SourceCompilerOutput {
//!         // Invoke your real compiler here; write job.output_path on
//!         // success, return diagnostics on failure.
//!         std::fs::write(&job.output_path, b"binary").unwrap();
//!         SourceCompilerOutput {
//!             binary: Some(job.output_path.clone()),
//!             diagnostics: Vec::new(),
//!         }
//!     }
//! }
//!
//! fn main() -> Result<(), ContractError> {
//!     let compiler = WorkflowCompiler::builder(Arc::new(MyCompiler)).build();
//!
//!     let mut parameters = CompilerParameters::new("mylang");
//!     parameters.generate_in_memory = true;
//!
//!     let results = compiler.compile(&parameters, &[PathBuf::from("flow.xoml")])?;
//!     for error in &results.errors {
//!         eprintln!("{}", error);
//!     }
//!     if !results.has_errors() {
//!         println!("compiled {} bytes", results.assembly_bytes.unwrap().len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod codegen;
pub mod compiler;
pub mod error;
pub mod markup;
pub mod prelude;
pub mod resolve;
pub mod results;
pub mod validation;
