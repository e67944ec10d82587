use std::path::Path;

use super::source_loader::{SourceError, display_name, load_source};

#[test]
fn missing_file() {
    let err = load_source(Path::new("does/not/exist.d")).unwrap_err();

    assert!(matches!(err, SourceError::File { .. }));
    insta::assert_snapshot!(err, @"failed to read 'does/not/exist.d': No such file or directory (os error 2)");
}

#[test]
fn reads_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");

    let source = load_source(&path).unwrap();

    assert!(source.contains("name = \"sidefx\""));
}

#[test]
fn display_names() {
    assert_eq!(display_name(Path::new("-")), "<stdin>");
    assert_eq!(display_name(Path::new("src/app.d")), "src/app.d");
}
