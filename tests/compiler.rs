//! Tests for the orchestrator: input contracts, reference handling,
//! backend job shaping and failure isolation.
mod common;
use common::*;
use std::sync::Arc;
use telar::prelude::*;

fn full_parameters() -> CompilerParameters {
    CompilerParameters::new("neutral")
}

#[test]
fn empty_batch_violates_the_contract() {
    let compiler = WorkflowCompiler::builder(Arc::new(FakeSourceCompiler::succeeding())).build();
    let error = compiler.compile(&full_parameters(), &[]).unwrap_err();
    assert!(matches!(error, ContractError::NoInputFiles));
}

#[test]
fn blank_language_violates_the_contract() {
    let compiler = WorkflowCompiler::builder(Arc::new(FakeSourceCompiler::succeeding())).build();
    let error = compiler
        .compile(&CompilerParameters::new("  "), &[PathBuf::from("flow.xoml")])
        .unwrap_err();
    assert!(matches!(error, ContractError::MissingLanguage));
}

#[test]
fn malformed_file_is_excluded_while_siblings_continue() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bad = write_file(dir.path(), "bad.xoml", "<Sequence>\n  <Delay>");
    let good = write_file(dir.path(), "good.xoml", APPROVAL_XOML);

    let compiler = WorkflowCompiler::builder(Arc::new(FakeSourceCompiler::succeeding())).build();
    let results = compiler
        .compile(&unit_only_parameters(), &[bad.clone(), good])
        .expect("compile");

    assert!(results.has_errors());
    assert!(results.file_has_errors(&bad.display().to_string()));
    assert!(results
        .errors
        .iter()
        .all(|error| error.code == codes::MARKUP_PARSE));

    // The sibling still made it through generation.
    let unit = results.compile_unit.expect("unit");
    assert_eq!(unit.type_names(), vec!["Flows.Approval".to_string()]);
}

#[test]
fn core_library_reference_never_reaches_the_backend() {
    let dir = tempfile::tempdir().expect("tempdir");
    let flow = write_file(dir.path(), "flow.xoml", APPROVAL_XOML);

    let mut parameters = full_parameters();
    parameters.references = vec![
        dir.path().join("CoreLib.bin"),
        dir.path().join("utils.bin"),
    ];

    let backend = Arc::new(FakeSourceCompiler::succeeding());
    let compiler = WorkflowCompiler::builder(backend.clone()).build();
    let results = compiler.compile(&parameters, &[flow]).expect("compile");
    assert!(!results.has_errors());

    let jobs = backend.jobs.lock().unwrap();
    assert_eq!(jobs.len(), 2);
    for job in jobs.iter() {
        assert_eq!(job.references, vec![dir.path().join("utils.bin")]);
    }
}

#[test]
fn pipeline_switches_are_stripped_from_forwarded_options() {
    let dir = tempfile::tempdir().expect("tempdir");
    let flow = write_file(dir.path(), "flow.xoml", APPROVAL_XOML);

    let mut parameters = full_parameters();
    parameters.compiler_options = "/NoCode+ /warn:4".to_string();

    let backend = Arc::new(FakeSourceCompiler::succeeding());
    let compiler = WorkflowCompiler::builder(backend.clone()).build();
    let results = compiler.compile(&parameters, &[flow]).expect("compile");
    assert!(!results.has_errors());

    let jobs = backend.jobs.lock().unwrap();
    assert_eq!(jobs[0].options, "/warn:4");
    assert_eq!(jobs[1].options, "/warn:4");
}

#[test]
fn no_code_switch_rejects_inline_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let flow = write_file(
        dir.path(),
        "flow.xoml",
        r#"<Sequence x:Class="Flows.Coded">
    <CodeBlock Name="step" Code="do_things()" />
</Sequence>
"#,
    );

    let mut parameters = full_parameters();
    parameters.compiler_options = "/nocode".to_string();

    let backend = Arc::new(FakeSourceCompiler::succeeding());
    let compiler = WorkflowCompiler::builder(backend.clone()).build();
    let results = compiler.compile(&parameters, &[flow]).expect("compile");

    assert!(results.has_errors());
    assert_eq!(results.errors.len(), 1);
    assert_eq!(results.errors[0].code, codes::INLINE_CODE_FORBIDDEN);
    // A structural failure stops the build before any backend job.
    assert_eq!(backend.job_count(), 0);
}

#[test]
fn local_job_forces_debug_on_and_warnings_as_errors_off() {
    let dir = tempfile::tempdir().expect("tempdir");
    let flow = write_file(dir.path(), "flow.xoml", APPROVAL_XOML);
    let extra = write_file(dir.path(), "extra.src", "user code");

    let mut parameters = full_parameters();
    parameters.include_debug_information = false;
    parameters.optimize = true;
    parameters.treat_warnings_as_errors = true;
    parameters.resources = vec![dir.path().join("strings.resources")];
    parameters.compiler_version = Some("v2".to_string());

    let backend = Arc::new(FakeSourceCompiler::succeeding());
    let compiler = WorkflowCompiler::builder(backend.clone()).build();
    let results = compiler
        .compile(&parameters, &[flow, extra.clone()])
        .expect("compile");
    assert!(!results.has_errors());

    let jobs = backend.jobs.lock().unwrap();
    assert_eq!(jobs.len(), 2);

    let local = &jobs[0];
    assert!(local.include_debug_information);
    assert!(!local.treat_warnings_as_errors);
    assert!(local.optimize);

    let final_job = &jobs[1];
    assert!(!final_job.include_debug_information);
    assert!(final_job.treat_warnings_as_errors);
    assert!(final_job.optimize);

    // Both jobs see the generated source first, then the user sources,
    // and carry the resources and version tag untouched.
    for job in jobs.iter() {
        assert_eq!(job.sources.len(), 2);
        assert_eq!(job.sources[1], extra);
        assert_eq!(job.resources, vec![dir.path().join("strings.resources")]);
        assert_eq!(job.compiler_version.as_deref(), Some("v2"));
    }
}

#[test]
fn absent_output_path_delivers_bytes_in_memory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let flow = write_file(dir.path(), "flow.xoml", APPROVAL_XOML);

    let compiler = WorkflowCompiler::builder(Arc::new(FakeSourceCompiler::succeeding())).build();
    let results = compiler.compile(&full_parameters(), &[flow]).expect("compile");

    assert!(!results.has_errors());
    assert_eq!(results.assembly_bytes.as_deref(), Some(&b"FAKE-BINARY"[..]));
    assert!(results.assembly_path.is_none());

    // Every temporary path is gone once the call returns.
    assert!(!results.temp_files.is_empty());
    for path in &results.temp_files {
        assert!(!path.exists(), "leftover temp path {}", path.display());
    }
}

#[test]
fn explicit_output_path_is_kept_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let flow = write_file(dir.path(), "flow.xoml", APPROVAL_XOML);
    let out = dir.path().join("flows.bin");

    let mut parameters = full_parameters();
    parameters.output_assembly = Some(out.clone());

    let compiler = WorkflowCompiler::builder(Arc::new(FakeSourceCompiler::succeeding())).build();
    let results = compiler.compile(&parameters, &[flow]).expect("compile");

    assert!(!results.has_errors());
    assert_eq!(results.assembly_path.as_deref(), Some(out.as_path()));
    assert!(results.assembly_bytes.is_none());
    assert_eq!(std::fs::read(&out).expect("output"), b"FAKE-BINARY");
}

#[test]
fn identifier_findings_still_reach_the_local_compile() {
    let dir = tempfile::tempdir().expect("tempdir");
    let flow = write_file(
        dir.path(),
        "flow.xoml",
        r#"<Sequence x:Class="Flows.Doubled">
    <Delay Name="same" />
    <Delay Name="same" />
</Sequence>
"#,
    );

    let backend = Arc::new(FakeSourceCompiler::succeeding());
    let compiler = WorkflowCompiler::builder(backend.clone()).build();
    let results = compiler.compile(&full_parameters(), &[flow]).expect("compile");

    assert!(results.has_errors());
    assert!(results
        .errors
        .iter()
        .any(|error| error.code == codes::DUPLICATE_IDENTIFIER));
    // The local job ran; the final compile did not.
    assert_eq!(backend.job_count(), 1);
    assert!(results.assembly_bytes.is_none());
    assert!(results.assembly_path.is_none());
}

#[test]
fn backend_panic_surfaces_as_a_single_unknown_exception() {
    let dir = tempfile::tempdir().expect("tempdir");
    let flow = write_file(dir.path(), "flow.xoml", APPROVAL_XOML);

    let compiler = WorkflowCompiler::builder(Arc::new(FakeSourceCompiler::panicking())).build();
    let results = compiler.compile(&full_parameters(), &[flow]).expect("compile");

    assert_eq!(results.errors.len(), 1);
    assert_eq!(results.errors[0].code, codes::UNKNOWN_EXCEPTION);
    assert!(!results.errors[0].is_warning);
}
