//! Ordered directory listing tests.

use std::fs;

use frameprep::{FrameError, ordered_frames};

#[test]
fn frames_sort_numerically_not_lexicographically() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    for name in ["10.jpg", "7.jpg", "100.jpg", "2.jpg"] {
        fs::write(directory.path().join(name), b"jpeg bytes").expect("Failed to write file");
    }

    let frames = ordered_frames(directory.path()).expect("Failed to list directory");
    let names: Vec<String> = frames
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, vec!["2.jpg", "7.jpg", "10.jpg", "100.jpg"]);
}

#[test]
fn filesystem_artifacts_are_ignored() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    for name in ["1000.jpg", ".DS_Store", "Thumbs.db", "2000.jpg"] {
        fs::write(directory.path().join(name), b"x").expect("Failed to write file");
    }

    let frames = ordered_frames(directory.path()).expect("Failed to list directory");
    assert_eq!(frames.len(), 2);
}

#[test]
fn non_numeric_filename_is_a_hard_error() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(directory.path().join("1000.jpg"), b"x").expect("Failed to write file");
    fs::write(directory.path().join("notes.txt"), b"x").expect("Failed to write file");

    let result = ordered_frames(directory.path());
    assert!(matches!(result, Err(FrameError::FrameFilename { .. })));

    let message = result.unwrap_err().to_string();
    assert!(
        message.contains("notes.txt"),
        "Error should name the offending file: {message}",
    );
}

#[test]
fn empty_directory_lists_nothing() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let frames = ordered_frames(directory.path()).expect("Failed to list directory");
    assert!(frames.is_empty());
}

#[test]
fn missing_directory_is_an_io_error() {
    let result = ordered_frames("this_directory_does_not_exist");
    assert!(matches!(result, Err(FrameError::Io(_))));
}
