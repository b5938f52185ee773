use mdexport_fs::io;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("test.txt");

    io::write_atomic(&path, b"hello world").unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "hello world");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("test.txt");
    fs::write(&file_path, "original").unwrap();

    io::write_atomic(&file_path, b"updated").unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");

    io::write_atomic(&path, b"[sync]\n").unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "found temp files: {leftovers:?}");
}

#[test]
fn test_read_text_nonexistent_file() {
    let result = io::read_text(std::path::Path::new("/nonexistent/file.txt"));
    assert_eq!(
        result.unwrap_err().io_kind(),
        Some(std::io::ErrorKind::NotFound)
    );
}

#[test]
fn test_copy_file_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("logo.png");
    fs::write(&source, [0x89, b'P', b'N', b'G']).unwrap();
    let destination = temp.path().join("out").join("assets").join("logo.png");

    let bytes = io::copy_file(&source, &destination).unwrap();

    assert_eq!(bytes, 4);
    assert_eq!(fs::read(&destination).unwrap(), vec![0x89, b'P', b'N', b'G']);
}

#[test]
fn test_copy_file_overwrites_in_place() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("a.txt");
    let destination = temp.path().join("b.txt");
    fs::write(&source, "new").unwrap();
    fs::write(&destination, "old content").unwrap();

    io::copy_file(&source, &destination).unwrap();

    assert_eq!(fs::read_to_string(&destination).unwrap(), "new");
}

#[test]
fn test_copy_file_missing_source_reports_source_path() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("missing.txt");
    let destination = temp.path().join("out.txt");

    let err = io::copy_file(&source, &destination).unwrap_err();

    match err {
        mdexport_fs::Error::Io { path, .. } => assert_eq!(path, source),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_remove_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("stale.pdf");
    fs::write(&file, "x").unwrap();

    io::remove_file(&file).unwrap();

    assert!(!file.exists());
}

#[test]
fn test_remove_missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let err = io::remove_file(&temp.path().join("gone.pdf")).unwrap_err();
    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
}

#[test]
fn test_file_len() {
    let temp = TempDir::new().unwrap();
    let empty = temp.path().join("empty.pdf");
    let full = temp.path().join("full.pdf");
    fs::write(&empty, "").unwrap();
    fs::write(&full, "%PDF").unwrap();

    assert_eq!(io::file_len(&empty), Some(0));
    assert_eq!(io::file_len(&full), Some(4));
    assert_eq!(io::file_len(&temp.path().join("none.pdf")), None);
    assert_eq!(io::file_len(temp.path()), None);
}
