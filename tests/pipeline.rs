//! End-to-end pipeline runs against replayed network and git interactions.

use std::path::{Path, PathBuf};

use serde_json::json;

use reposcout::cassette::recorder::CassetteRecorder;
use reposcout::classify::key_files::KeyCategory;
use reposcout::classify::language::Language;
use reposcout::classify::FileStatus;
use reposcout::config::ScoutConfig;
use reposcout::context::ServiceContext;
use reposcout::error::{AcquisitionError, PipelineError};
use reposcout::pipeline::{PipelineRun, RunState};

fn write_cassette(path: &Path, statuses: &[u16], clone_ok: bool) -> PathBuf {
    let mut recorder = CassetteRecorder::new(path, "pipeline-test");
    for code in statuses {
        recorder.record("http", "get_status", json!({}), json!({ "Ok": code }));
    }
    if clone_ok {
        recorder.record(
            "git",
            "clone_repo",
            json!({}),
            json!({ "Ok": { "finished": { "success": true, "stderr": "" } } }),
        );
    }
    recorder.finish().expect("cassette should be written")
}

fn index_js() -> String {
    let mut src = String::from(
        "function start() {\n  return 1;\n}\nfunction stop() {\n  return 0;\n}\n",
    );
    for i in 0..44 {
        src.push_str(&format!("console.log({i});\n"));
    }
    src
}

#[test]
fn acquired_copy_is_classified() {
    let dir = tempfile::tempdir().unwrap();
    let cassette = write_cassette(&dir.path().join("ok.cassette.yaml"), &[200, 200], true);
    let ctx = ServiceContext::replaying(&cassette).unwrap();
    let config = ScoutConfig { workdir: dir.path().join("work"), ..ScoutConfig::default() };

    let mut run = PipelineRun::new(&ctx, &config);
    let root = run.acquire("https://github.com/acme/widget").unwrap().root().to_path_buf();
    assert_eq!(root, dir.path().join("work").join("widget"));

    std::fs::write(root.join("README.md"), "# Widget\n\nDoes things.\n").unwrap();
    std::fs::write(root.join("package.json"), "{\"name\": \"widget\"}\n").unwrap();
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(root.join("src/index.js"), index_js()).unwrap();

    let analysis = run.classify().unwrap();
    assert_eq!(run.state(), RunState::Indexed);

    let index = &analysis.index;
    let js = &index.structure.languages[&Language::JavaScript];
    assert_eq!(js.files, 1);
    assert_eq!(js.lines, 50);
    assert_eq!(index.structure.total_functions, 2);
    assert_eq!(index.structure.total_classes, 0);

    assert!(index.ranked.iter().any(|r| r.path == "src/index.js"));
    let docs = &index.key_files[&KeyCategory::Documentation];
    assert!(docs.iter().any(|e| e.path == "README.md"));
    let project = &index.key_files[&KeyCategory::ProjectConfig];
    assert!(project.iter().any(|e| e.path == "package.json"));

    assert!(index.directories.contains_key(""));
    assert!(index.directories.contains_key("src"));
    assert!(analysis.details.iter().any(|d| d.path == "src/index.js"));
}

#[test]
fn missing_repository_leaves_no_workdir() {
    let dir = tempfile::tempdir().unwrap();
    let cassette = write_cassette(&dir.path().join("404.cassette.yaml"), &[200, 404], false);
    let ctx = ServiceContext::replaying(&cassette).unwrap();
    let workdir = dir.path().join("work");
    let config = ScoutConfig { workdir: workdir.clone(), ..ScoutConfig::default() };

    let mut run = PipelineRun::new(&ctx, &config);
    let err = run.acquire("https://github.com/acme/ghost").unwrap_err();
    assert!(matches!(err, PipelineError::Acquisition(AcquisitionError::ResourceNotFound { .. })));
    assert_eq!(run.state(), RunState::AcquisitionFailed);
    assert!(!workdir.exists());
}

#[test]
fn empty_file_is_recorded_without_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let cassette = write_cassette(&dir.path().join("ok.cassette.yaml"), &[200, 200], true);
    let ctx = ServiceContext::replaying(&cassette).unwrap();
    let config = ScoutConfig { workdir: dir.path().join("work"), ..ScoutConfig::default() };

    let mut run = PipelineRun::new(&ctx, &config);
    let root = run.acquire("https://github.com/acme/widget").unwrap().root().to_path_buf();
    std::fs::write(root.join("empty.py"), "").unwrap();

    let analysis = run.classify().unwrap();
    let record = analysis.index.record("empty.py").unwrap();
    assert_eq!(record.status, FileStatus::Empty);
    assert_eq!(record.size, 0);
    assert_eq!(analysis.index.errors, 0);
    assert!(analysis.index.structure.languages.is_empty());
}
