use mdexport_fs::NormalizedPath;
use rstest::rstest;

#[test]
fn test_normalize_forward_slashes() {
    let path = NormalizedPath::new("foo/bar/baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("foo\\bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_normalize_mixed_slashes() {
    let path = NormalizedPath::new("foo/bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_file_name() {
    let path = NormalizedPath::new("foo/bar/baz.txt");
    assert_eq!(path.file_name(), Some("baz.txt"));
}

#[rstest]
#[case("notes.md", Some("md"))]
#[case("notes.MD", Some("MD"))]
#[case("archive.tar.gz", Some("gz"))]
#[case(".gitignore", None)]
#[case("Makefile", None)]
#[case("dir.v1/Makefile", None)]
fn test_extension(#[case] input: &str, #[case] expected: Option<&str>) {
    assert_eq!(NormalizedPath::new(input).extension(), expected);
}

#[rstest]
#[case("intro.md", "intro.pdf")]
#[case("deep/nested/Intro.MD", "deep/nested/Intro.pdf")]
#[case("no-extension", "no-extension.pdf")]
fn test_with_extension(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).with_extension("pdf").as_str(), expected);
}

#[test]
fn test_serializes_as_plain_string() {
    let path = NormalizedPath::new("a\\b.md");
    assert_eq!(serde_json::to_string(&path).unwrap(), "\"a/b.md\"");

    let back: NormalizedPath = serde_json::from_str("\"x\\\\y.md\"").unwrap();
    assert_eq!(back.as_str(), "x/y.md");
}
