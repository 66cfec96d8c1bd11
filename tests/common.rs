//! Common test utilities: a scripted source-compiler double and helpers
//! for building markup files and activity trees.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use telar::prelude::*;

/// A scripted stand-in for the downstream compiler. Records every
/// invocation, captures the generated source text while it still exists,
/// and can be told to fail or to emit canned diagnostics.
#[allow(dead_code)]
pub struct FakeSourceCompiler {
    pub jobs: Mutex<Vec<SourceCompilation>>,
    /// Contents of each job's first source file, read at invocation time.
    pub captured_sources: Mutex<Vec<String>>,
    pub diagnostics: Vec<RawDiagnostic>,
    pub produce_binary: bool,
    pub panic_on_compile: bool,
}

#[allow(dead_code)]
impl FakeSourceCompiler {
    pub fn succeeding() -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            captured_sources: Mutex::new(Vec::new()),
            diagnostics: Vec::new(),
            produce_binary: true,
            panic_on_compile: false,
        }
    }

    pub fn with_diagnostics(diagnostics: Vec<RawDiagnostic>, produce_binary: bool) -> Self {
        Self {
            diagnostics,
            produce_binary,
            ..Self::succeeding()
        }
    }

    pub fn panicking() -> Self {
        Self {
            panic_on_compile: true,
            ..Self::succeeding()
        }
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }
}

impl SourceCompiler for FakeSourceCompiler {
    fn compile(&self, job: &SourceCompilation) -> SourceCompilerOutput {
        if self.panic_on_compile {
            panic!("scripted backend failure");
        }
        self.jobs.lock().unwrap().push(job.clone());
        if let Some(first) = job.sources.first() {
            if let Ok(text) = fs::read_to_string(first) {
                self.captured_sources.lock().unwrap().push(text);
            }
        }
        if !self.produce_binary {
            return SourceCompilerOutput {
                binary: None,
                diagnostics: self.diagnostics.clone(),
            };
        }
        fs::write(&job.output_path, b"FAKE-BINARY").expect("fake binary write");
        SourceCompilerOutput {
            binary: Some(job.output_path.clone()),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

/// Routes `log` output into the test harness's captured output.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A well-formed workflow: unique names, a class declaration on the root.
#[allow(dead_code)]
pub const APPROVAL_XOML: &str = r#"<Sequence x:Class="Flows.Approval" Name="approval_root">
    <CodeBlock Name="gather_input" />
    <Delay Name="cool_down" />
</Sequence>
"#;

/// Writes `contents` under `dir` and returns the full path.
#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("test file write");
    path
}

/// Builds an `ActivityNode` for validator and generator tests. Positions
/// are synthesized from a counter so attribution is distinguishable.
#[allow(dead_code)]
pub fn activity(name: &str, enabled: bool, line: u32, children: Vec<ActivityNode>) -> ActivityNode {
    ActivityNode {
        type_name: "Workflow.Activities.Sequence".to_string(),
        name: name.to_string(),
        enabled,
        code: None,
        declared_class: None,
        children,
        line,
        column: 1,
    }
}

/// A root node carrying the class marker.
#[allow(dead_code)]
pub fn class_root(class: &str, children: Vec<ActivityNode>) -> ActivityNode {
    ActivityNode {
        declared_class: Some(class.to_string()),
        ..activity("", true, 1, children)
    }
}

/// Parameters pointed at compile-unit-only mode, which most pipeline
/// tests start from.
#[allow(dead_code)]
pub fn unit_only_parameters() -> CompilerParameters {
    let mut parameters = CompilerParameters::new("neutral");
    parameters.generate_code_compile_unit_only = true;
    parameters
}
