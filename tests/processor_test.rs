use std::fs;

use kiln::builder::BuildSession;
use kiln::classifier::PathClassifier;
use kiln::constants::DEFAULT_TEMPLATED;
use kiln::processor::{FileOperation, Processor};
use kiln::renderer::MiniJinjaRenderer;
use tempfile::TempDir;

#[test]
fn test_process_each_entry_kind() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    fs::create_dir_all(src.join("posts")).unwrap();
    fs::write(src.join("index.html"), "<p>${ CURRENT_PATH }</p>").unwrap();
    fs::write(src.join("nav.dev.html"), "<nav></nav>").unwrap();
    fs::write(src.join("robots.txt"), "User-agent: *").unwrap();

    let session = BuildSession::new(temp_dir.path(), "src", "build").unwrap();
    let engine = MiniJinjaRenderer::new(session.base_dir());
    let classifier = PathClassifier::new(&DEFAULT_TEMPLATED).unwrap();
    let processor = Processor::new(&engine, &classifier, &session);
    let source = session.source_root();
    let out = session.output_root();

    assert_eq!(
        processor.process(&source.join("index.html"), false).unwrap(),
        FileOperation::Write { target: out.join("index.html"), content: "<p>index.html</p>".into() }
    );
    assert_eq!(
        processor.process(&source.join("robots.txt"), false).unwrap(),
        FileOperation::Copy { source: source.join("robots.txt"), target: out.join("robots.txt") }
    );
    assert_eq!(
        processor.process(&source.join("posts"), true).unwrap(),
        FileOperation::CreateDirectory { target: out.join("posts") }
    );
    assert_eq!(
        processor.process(&source.join("nav.dev.html"), false).unwrap(),
        FileOperation::Exclude { source: source.join("nav.dev.html") }
    );
    assert!(!out.exists());
}

#[test]
fn test_apply_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("build/a/b/c.html");

    let operation = FileOperation::Write { target: target.clone(), content: "deep".into() };
    operation.apply().unwrap();

    assert_eq!(operation.action(), "Writing");
    assert_eq!(fs::read_to_string(target).unwrap(), "deep");
}
