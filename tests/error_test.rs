use std::io;

use kiln::error::{Error, IncludeError};
use minijinja::ErrorKind;

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::NotFound {
        path: "./nav.html".to_string(),
        included_from: "src/index.html".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Cannot include './nav.html' from 'src/index.html': file not found."
    );
}

#[test]
fn test_io_error_names_operation_and_path() {
    let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
    let err = Error::io("write", "build/index.html", io_err);

    match &err {
        Error::IoError { operation, path, .. } => {
            assert_eq!(*operation, "write");
            assert_eq!(path, "build/index.html");
        }
        other => panic!("Expected IoError variant, got {other:?}"),
    }
    assert!(err.to_string().contains("failed to write 'build/index.html'"));
}

#[test]
fn test_evaluation_without_include_failure() {
    let source = minijinja::Error::new(ErrorKind::UndefinedError, "undefined value");
    match Error::evaluation("src/index.html", source) {
        Error::EvaluationError { path, source } => {
            assert_eq!(path, "src/index.html");
            assert_eq!(source.kind(), ErrorKind::UndefinedError);
        }
        other => panic!("Expected EvaluationError variant, got {other:?}"),
    }
}

#[test]
fn test_evaluation_with_missing_include() {
    let include = IncludeError {
        path: "partials/nav.html".into(),
        source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
    };
    let source = minijinja::Error::new(ErrorKind::InvalidOperation, include.to_string())
        .with_source(include);

    match Error::evaluation("index.html", source) {
        Error::NotFound { path, included_from } => {
            assert_eq!(path, "partials/nav.html");
            assert_eq!(included_from, "index.html");
        }
        other => panic!("Expected NotFound variant, got {other:?}"),
    }
}

#[test]
fn test_evaluation_with_unreadable_include() {
    let include = IncludeError {
        path: "partials/blob.bin".into(),
        source: io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
    };
    let source = minijinja::Error::new(ErrorKind::InvalidOperation, include.to_string())
        .with_source(include);

    match Error::evaluation("index.html", source) {
        Error::IoError { operation, path, source } => {
            assert_eq!(operation, "include");
            assert_eq!(path, "partials/blob.bin");
            assert_eq!(source.kind(), io::ErrorKind::InvalidData);
            assert_eq!(source.to_string(), "stream did not contain valid UTF-8");
        }
        other => panic!("Expected IoError variant, got {other:?}"),
    }
}
