use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use telar::prelude::*;

/// Compile workflow markup files and print the generated compile unit.
///
/// The CLI runs the pipeline in compile-unit-only mode: it never invokes
/// a downstream compiler, so it needs no backend configuration. It exists
/// for inspecting generated output and diagnostics from the shell.
#[derive(Parser)]
#[command(name = "telar-cli", version, about)]
struct Cli {
    /// Input files: .xoml markup plus plain source files.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Reference assembly paths (a sidecar `<ref>.types.json` manifest
    /// describes the types each one exports).
    #[arg(short, long)]
    reference: Vec<PathBuf>,

    /// Target language tag (defaults to "neutral").
    #[arg(short, long)]
    language: Option<String>,

    /// Namespace prefix applied to every generated type.
    #[arg(long, default_value = "")]
    root_namespace: String,

    /// Reject inline code found in the markup.
    #[arg(long)]
    no_code: bool,

    /// Extra options forwarded to the pipeline's option parser.
    #[arg(long, default_value = "")]
    options: String,

    /// JSON file holding a full `CompilerParameters` value; the other
    /// flags override its fields where given.
    #[arg(short, long)]
    parameters: Option<PathBuf>,
}

fn load_parameters(cli: &Cli) -> Result<CompilerParameters, String> {
    let mut parameters = match &cli.parameters {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|error| format!("{}: {}", path.display(), error))?;
            serde_json::from_str(&raw)
                .map_err(|error| format!("{}: {}", path.display(), error))?
        }
        None => CompilerParameters::new("neutral"),
    };

    if let Some(language) = &cli.language {
        parameters.language = language.clone();
    }
    if !cli.reference.is_empty() {
        parameters.references = cli.reference.clone();
    }
    if !cli.root_namespace.is_empty() {
        parameters.root_namespace = cli.root_namespace.clone();
    }
    if cli.no_code {
        parameters.compile_with_no_code = true;
    }
    if !cli.options.is_empty() {
        parameters.compiler_options = cli.options.clone();
    }
    parameters.generate_code_compile_unit_only = true;
    Ok(parameters)
}

/// The CLI never reaches the backend; compile-unit-only mode stops after
/// generation.
struct UnreachableCompiler;

impl SourceCompiler for UnreachableCompiler {
    fn compile(&self, _job: &SourceCompilation) -> SourceCompilerOutput {
        unreachable!("compile-unit-only mode never invokes the source compiler")
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let parameters = match load_parameters(&cli) {
        Ok(parameters) => parameters,
        Err(error) => {
            eprintln!("error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let compiler = WorkflowCompiler::builder(Arc::new(UnreachableCompiler)).build();
    let results = match compiler.compile(&parameters, &cli.files) {
        Ok(results) => results,
        Err(error) => {
            eprintln!("error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    for error in &results.errors {
        eprintln!("{}", error);
    }
    if let Some(unit) = &results.compile_unit {
        print!("{}", unit.render());
    }

    if results.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
