//! The compilation orchestrator: the crate's sole public entry point.
//!
//! One call moves through
//! `SplitInputs → ResolveReferences → IsolatedExecution → Cleanup`,
//! always returning a [`CompilerResults`] unless an argument contract was
//! violated before any stage ran.

use crate::backend::{
    DefaultLanguageService, LanguageService, SourceCompilation, SourceCompiler,
    SourceCompilerOutput,
};
use crate::codegen::{CodeGenerator, CompileUnit};
use crate::compiler::parameters::extract_switches;
use crate::compiler::session::{run_isolated, TempTracker};
use crate::error::ContractError;
use crate::markup::{self, MarkupDocumentLoader, MarkupElement};
use crate::resolve::{split_core_reference, ReferenceIndex};
use crate::results::{codes, CompilerError, CompilerResults};
use crate::validation::{check_authorized_types, IdentifierValidator};
use ahash::AHashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod parameters;
mod session;

pub use parameters::CompilerParameters;

const GENERATED_SOURCE_FILE: &str = "workflow.generated.src";
const LOCAL_ASSEMBLY_FILE: &str = "workflow.local.bin";
const IN_MEMORY_ASSEMBLY_FILE: &str = "workflow.out.bin";

/// Compiles batches of workflow markup and plain source files.
///
/// A `WorkflowCompiler` holds no per-call state; concurrent `compile`
/// calls are independent, each owning its own resolver index, temp
/// directory and result object.
pub struct WorkflowCompiler {
    source_compiler: Arc<dyn SourceCompiler>,
    language_service: Arc<dyn LanguageService>,
    authorized_types: Option<AHashSet<String>>,
}

pub struct WorkflowCompilerBuilder {
    source_compiler: Arc<dyn SourceCompiler>,
    language_service: Arc<dyn LanguageService>,
    authorized_types: Option<AHashSet<String>>,
}

impl WorkflowCompilerBuilder {
    pub fn new(source_compiler: Arc<dyn SourceCompiler>) -> Self {
        Self {
            source_compiler,
            language_service: Arc::new(DefaultLanguageService),
            authorized_types: None,
        }
    }

    pub fn with_language_service(mut self, service: Arc<dyn LanguageService>) -> Self {
        self.language_service = service;
        self
    }

    /// Configures the type set enforced by the `check_types` pass.
    pub fn with_authorized_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorized_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> WorkflowCompiler {
        WorkflowCompiler {
            source_compiler: self.source_compiler,
            language_service: self.language_service,
            authorized_types: self.authorized_types,
        }
    }
}

impl WorkflowCompiler {
    pub fn builder(source_compiler: Arc<dyn SourceCompiler>) -> WorkflowCompilerBuilder {
        WorkflowCompilerBuilder::new(source_compiler)
    }

    /// Compiles the given files under the given parameters.
    ///
    /// Always returns `Ok` with a complete result object, whatever went
    /// wrong inside the pipeline; `Err` is reserved for argument-contract
    /// violations detected before any stage runs.
    pub fn compile(
        &self,
        parameters: &CompilerParameters,
        files: &[PathBuf],
    ) -> Result<CompilerResults, ContractError> {
        if files.is_empty() {
            return Err(ContractError::NoInputFiles);
        }
        if parameters.language.trim().is_empty() {
            return Err(ContractError::MissingLanguage);
        }

        // SplitInputs: markup vs plain source, order preserved within
        // each partition.
        let (markup_files, source_files): (Vec<&Path>, Vec<&Path>) = files
            .iter()
            .map(PathBuf::as_path)
            .partition(|path| markup::is_markup_file(path));

        // ResolveReferences: the core library must not reach the
        // downstream compiler twice, but resolution still sees it.
        let (downstream_references, core_library) = split_core_reference(&parameters.references);

        let (forwarded_options, switches) = extract_switches(&parameters.compiler_options);
        let no_code = parameters.compile_with_no_code || switches.no_code;
        let check_types = parameters.check_types || switches.check_types;

        log::debug!(
            "compiling {} markup file(s) and {} source file(s)",
            markup_files.len(),
            source_files.len()
        );

        let outcome = run_isolated(|| {
            self.run_pipeline(
                parameters,
                &markup_files,
                &source_files,
                &downstream_references,
                core_library.clone(),
                &forwarded_options,
                no_code,
                check_types,
            )
        });

        let mut results = match outcome {
            Ok((results, tracker)) => {
                let mut results = results;
                results.temp_files = tracker.paths().to_vec();
                // Cleanup runs only after the worker has terminated, so
                // nothing inside it still holds the files open.
                tracker.cleanup();
                results
            }
            Err(()) => {
                let mut results = CompilerResults::default();
                results.push(CompilerError::unattributed(
                    codes::UNKNOWN_EXCEPTION,
                    "an unknown compiler exception occurred",
                ));
                results
            }
        };

        if results.has_errors() {
            log::debug!("compile finished with {} diagnostic(s)", results.errors.len());
        }
        results.errors.shrink_to_fit();
        Ok(results)
    }

    /// The whole sub-pipeline that runs inside the isolated session.
    #[allow(clippy::too_many_arguments)]
    fn run_pipeline(
        &self,
        parameters: &CompilerParameters,
        markup_files: &[&Path],
        source_files: &[&Path],
        downstream_references: &[PathBuf],
        core_library: Option<PathBuf>,
        forwarded_options: &str,
        no_code: bool,
        check_types: bool,
    ) -> (CompilerResults, TempTracker) {
        let mut results = CompilerResults::default();
        let mut tracker = TempTracker::new();

        let mut index = ReferenceIndex::new(downstream_references.to_vec(), core_library);

        // Parse phase: every file is read once; a file that fails here is
        // excluded from all later stages while its siblings continue.
        let mut parsed: Vec<(String, Option<MarkupElement>)> =
            Vec::with_capacity(markup_files.len());
        for path in markup_files {
            let file = path.display().to_string();
            match markup::parse_file(path) {
                Ok(root) => {
                    if let Some(class) = markup::declared_class(&root) {
                        index.register_pending_class(class);
                    }
                    parsed.push((file, Some(root)));
                }
                Err(error) => {
                    results.push(CompilerError::from_markup(&file, &error));
                    parsed.push((file, None));
                }
            }
        }

        let validator = IdentifierValidator::new(self.language_service.as_ref());
        let generator = CodeGenerator::new(no_code);
        let mut unit = CompileUnit::default();

        for (file, root) in &parsed {
            let Some(root) = root else { continue };

            let tree = match MarkupDocumentLoader::new(&index).build_tree(root) {
                Ok(tree) => tree,
                Err(error) => {
                    results.push(CompilerError::from_markup(file, &error));
                    continue;
                }
            };

            // Validation findings do not block generation for this file;
            // the build fails at the end via has_errors instead.
            for finding in validator.validate(file, &tree) {
                results.push(finding);
            }
            if check_types {
                if let Some(authorized) = &self.authorized_types {
                    for finding in check_authorized_types(file, &tree, authorized) {
                        results.push(finding);
                    }
                }
            }

            let mut generation_errors = Vec::new();
            if let Some(fragment) = generator.generate(file, &tree, &mut generation_errors) {
                unit.merge(fragment);
            }
            for error in generation_errors {
                results.push(error);
            }
        }

        CodeGenerator::normalize(&mut unit, &parameters.root_namespace);

        if parameters.generate_code_compile_unit_only {
            results.compile_unit = Some(unit);
            return (results, tracker);
        }

        // Validation findings alone do not stop the local build: the
        // downstream compiler rejects the same identifiers with its own
        // positions, which the caller gets in addition.
        if has_fatal_errors(&results) {
            return (results, tracker);
        }

        let build_dir = match tracker.allocate_dir() {
            Ok(dir) => dir,
            Err(error) => {
                results.push(CompilerError::unattributed(
                    codes::UNKNOWN_EXCEPTION,
                    format!("failed to allocate a temporary build directory: {}", error),
                ));
                return (results, tracker);
            }
        };

        let generated_path = build_dir.join(GENERATED_SOURCE_FILE);
        if let Err(error) = std::fs::write(&generated_path, unit.render()) {
            results.push(CompilerError::unattributed(
                codes::UNKNOWN_EXCEPTION,
                format!("failed to write generated source: {}", error),
            ));
            return (results, tracker);
        }

        let mut sources: Vec<PathBuf> = vec![generated_path];
        sources.extend(source_files.iter().map(|path| path.to_path_buf()));

        // EmitLocalAssembly: debug info forced on, warnings-as-errors
        // forced off, output under the call's own temp directory.
        let local_job = SourceCompilation {
            language: parameters.language.clone(),
            compiler_version: parameters.compiler_version.clone(),
            options: forwarded_options.to_string(),
            references: downstream_references.to_vec(),
            resources: parameters.resources.clone(),
            sources: sources.clone(),
            output_path: build_dir.join(LOCAL_ASSEMBLY_FILE),
            include_debug_information: true,
            optimize: parameters.optimize,
            treat_warnings_as_errors: false,
        };
        log::debug!("emitting local assembly to {}", local_job.output_path.display());
        let local_output = self.source_compiler.compile(&local_job);
        wrap_diagnostics(&mut results, &local_output);

        // Self-references already resolved through the pre-seeded class
        // names, so the local binary only has to exist; nothing resolves
        // against it afterwards.
        if local_output.binary.is_none() || results.has_errors() {
            return (results, tracker);
        }

        // FinalCompile: the caller's own parameters this time. An absent
        // output path means "produce in memory".
        let in_memory = parameters.generate_in_memory || parameters.output_assembly.is_none();
        let output_path = match &parameters.output_assembly {
            Some(path) if !parameters.generate_in_memory => path.clone(),
            _ => build_dir.join(IN_MEMORY_ASSEMBLY_FILE),
        };

        let final_job = SourceCompilation {
            language: parameters.language.clone(),
            compiler_version: parameters.compiler_version.clone(),
            options: forwarded_options.to_string(),
            references: downstream_references.to_vec(),
            resources: parameters.resources.clone(),
            sources,
            output_path,
            include_debug_information: parameters.include_debug_information,
            optimize: parameters.optimize,
            treat_warnings_as_errors: parameters.treat_warnings_as_errors,
        };
        log::debug!("final compile to {}", final_job.output_path.display());
        let final_output = self.source_compiler.compile(&final_job);
        wrap_diagnostics(&mut results, &final_output);

        if results.has_errors() {
            return (results, tracker);
        }
        if let Some(binary) = final_output.binary {
            if in_memory {
                match std::fs::read(&binary) {
                    Ok(bytes) => {
                        results.assembly_bytes = Some(bytes);
                        // The caller never sees this path; drop the file
                        // as soon as the bytes are loaded.
                        let _ = std::fs::remove_file(&binary);
                    }
                    Err(error) => {
                        results.push(CompilerError::unattributed(
                            codes::UNKNOWN_EXCEPTION,
                            format!("failed to load the produced assembly: {}", error),
                        ));
                    }
                }
            } else {
                results.assembly_path = Some(binary);
            }
        }

        (results, tracker)
    }
}

/// Fatal means anything other than an identifier/authorized-type finding:
/// parse failures, structural gate failures and unknown exceptions all
/// stop the build before the local assembly is attempted.
fn has_fatal_errors(results: &CompilerResults) -> bool {
    results.errors.iter().any(|error| {
        !error.is_warning
            && !matches!(
                error.code.as_str(),
                codes::DUPLICATE_IDENTIFIER
                    | codes::INVALID_IDENTIFIER
                    | codes::TYPE_NOT_AUTHORIZED
            )
    })
}

/// Wraps raw downstream diagnostics, applying the +1 position convention.
/// Severity is preserved verbatim.
fn wrap_diagnostics(results: &mut CompilerResults, output: &SourceCompilerOutput) {
    for diagnostic in &output.diagnostics {
        let code = if diagnostic.code.is_empty() {
            codes::SOURCE_COMPILER
        } else {
            diagnostic.code.as_str()
        };
        let line = if diagnostic.line >= 0 {
            diagnostic.line + 1
        } else {
            -1
        };
        let column = if diagnostic.column >= 0 {
            diagnostic.column + 1
        } else {
            -1
        };
        let mut error = CompilerError::at(&diagnostic.file, line, column, code, &diagnostic.message);
        if diagnostic.is_warning {
            error = error.as_warning();
        }
        results.push(error);
    }
}
