use kiln::classifier::{EntryKind, PathClassifier};
use kiln::constants::DEFAULT_TEMPLATED;
use kiln::error::Error;

fn classifier() -> PathClassifier {
    PathClassifier::new(&DEFAULT_TEMPLATED).unwrap()
}

#[test]
fn test_excluded_marker() {
    let classifier = classifier();
    assert!(classifier.is_excluded("nav.dev.html"));
    assert!(classifier.is_excluded("drafts.dev"));
    assert!(classifier.is_excluded("theme.dev.min.css"));
    assert!(classifier.is_excluded("post.dev.v2.html"));
    assert!(!classifier.is_excluded("device.html"));
    assert!(!classifier.is_excluded("dev.html"));
    assert!(!classifier.is_excluded("nav.html"));
}

#[test]
fn test_excluded_marker_is_a_whole_segment() {
    let classifier = classifier();
    assert!(classifier.is_excluded("icon.dev.2x.png"));
    assert!(!classifier.is_excluded("site.devices.html"));
    assert!(!classifier.is_excluded("notes.devel"));
    assert_eq!(classifier.classify("site.devices.html", false), EntryKind::Templated);
}

#[test]
fn test_classify_files() {
    let classifier = classifier();
    assert_eq!(classifier.classify("index.html", false), EntryKind::Templated);
    assert_eq!(classifier.classify("feed.rss", false), EntryKind::Templated);
    assert_eq!(classifier.classify("sitemap.xml", false), EntryKind::Templated);
    assert_eq!(classifier.classify("style.css", false), EntryKind::Templated);
    assert_eq!(classifier.classify("logo.png", false), EntryKind::Opaque);
    assert_eq!(classifier.classify("app.js", false), EntryKind::Opaque);
    assert_eq!(classifier.classify("index.html.bak", false), EntryKind::Opaque);
    assert_eq!(classifier.classify("nav.dev.html", false), EntryKind::Excluded);
}

#[test]
fn test_classify_directories() {
    let classifier = classifier();
    assert_eq!(classifier.classify("posts", true), EntryKind::Directory);
    assert_eq!(classifier.classify("fake.html", true), EntryKind::Directory);
    assert_eq!(classifier.classify("drafts.dev", true), EntryKind::Excluded);
}

#[test]
fn test_custom_patterns() {
    let classifier = PathClassifier::new(&["*.txt", "README*"]).unwrap();
    assert_eq!(classifier.classify("notes.txt", false), EntryKind::Templated);
    assert_eq!(classifier.classify("README.md", false), EntryKind::Templated);
    assert_eq!(classifier.classify("index.html", false), EntryKind::Opaque);
}

#[test]
fn test_invalid_pattern() {
    let err = PathClassifier::new(&["*.{html"]).unwrap_err();
    assert!(matches!(err, Error::GlobSetParseError(_)));
}
