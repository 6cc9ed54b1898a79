//! Conventions shared by every source file in the crate.

use std::fs;
use std::path::{Path, PathBuf};

fn rust_files(dir: &Path, found: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            rust_files(&path, found);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            found.push(path);
        }
    }
}

#[test]
fn files_do_not_open_with_a_path_comment() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut files = Vec::new();
    rust_files(&root.join("src"), &mut files);
    rust_files(&root.join("tests"), &mut files);
    assert!(!files.is_empty());

    let offenders: Vec<String> = files
        .iter()
        .filter(|path| {
            let source = fs::read_to_string(path).unwrap();
            let first = source.lines().next().unwrap_or("").trim();
            first.starts_with("// src/") || first.starts_with("// tests/")
        })
        .map(|path| path.display().to_string())
        .collect();

    assert_eq!(offenders, Vec::<String>::new());
}
