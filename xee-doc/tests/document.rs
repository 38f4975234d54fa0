use xee_doc::{Document, Error, Level};

mod common;

use common::{parse, xml_file, ENTRY_XML};

#[test]
fn test_open_file() {
    let (_dir, path) = xml_file(ENTRY_XML);
    let document = Document::open(&path);
    assert!(document.has_tree());
    assert!(document.last_error().is_none());
    assert_eq!(document.origin(), Some(path));
}

#[test]
fn test_open_malformed_file() {
    let (_dir, path) = xml_file("<Root><EntryType></Root>");
    let document = Document::open(&path);
    assert!(!document.has_tree());
    let err = document.last_error().unwrap();
    assert_eq!(err.level, Level::Error);
    assert_eq!(err.data, path.display().to_string());
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.xml");
    let err = Document::try_open(&path).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
    assert_eq!(err.data(), path.display().to_string());

    let document = Document::open(&path);
    assert!(!document.has_tree());
    assert!(document.last_error().unwrap().is_error());
}

#[test]
fn test_from_bytes() {
    let document = Document::from_bytes(ENTRY_XML.as_bytes());
    assert!(document.has_tree());
    assert!(document.last_error().is_none());
    assert_eq!(document.origin(), None);
}

#[test]
fn test_malformed_bytes_keep_input_as_data() {
    let input = "<a><b></a>";
    let document = Document::from_bytes(input.as_bytes());
    assert!(!document.has_tree());
    assert_eq!(document.last_error().unwrap().data, input);
}

#[test]
fn test_malformed_input_data_is_truncated() {
    let input = format!("<a>{}", "x".repeat(500));
    let err = Document::try_parse(&input).unwrap_err();
    assert_eq!(err.data().chars().count(), 200);
    assert!(input.starts_with(&err.data()));
}

#[test]
fn test_xml_has_declaration() {
    let mut document = parse(ENTRY_XML);
    let xml = document.xml();
    assert!(xml.starts_with("<?xml"), "{}", xml);
    assert!(xml.contains("UTF-8"));
    assert!(xml.contains("<Comment>hi</Comment>"));
    assert!(document.last_error().is_none());
}

#[test]
fn test_serialization_round_trip() {
    let mut document = parse(ENTRY_XML);
    let first = document.xml();
    let mut reparsed = parse(&first);
    assert_eq!(reparsed.xml(), first);
}

#[test]
fn test_mixed_content_round_trip() {
    let mut document = parse("<p>Some <b>bold</b> and <i>italic</i> text.<br/></p>");
    let first = document.xml();
    assert!(first.contains("Some <b>bold</b> and <i>italic</i> text."), "{}", first);
    let mut reparsed = parse(&first);
    assert_eq!(reparsed.xml(), first);
}

#[test]
fn test_indented_input_round_trip() {
    let input = "<Root>\n    <EntryType name=\"demo\">\n        <Comment>hi</Comment>\n    </EntryType>\n</Root>\n";
    let mut document = parse(input);
    let first = document.xml();
    let mut reparsed = parse(&first);
    assert_eq!(reparsed.xml(), first);
    assert_eq!(reparsed.xpath::<String>("string(//Comment)"), "hi");
}

#[test]
fn test_xml_without_tree() {
    let mut document = Document::parse("<broken");
    assert_eq!(document.xml(), "");
    let err = document.last_error().unwrap();
    assert_eq!(err.message(), "Document has no tree");
}

#[test]
fn test_save_as_updates_origin() {
    let mut document = parse(ENTRY_XML);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.xml");
    assert!(document.save_as(&path));
    assert!(document.last_error().is_none());
    assert_eq!(document.origin(), Some(path.clone()));

    let saved = std::fs::read_to_string(&path).unwrap();
    assert_eq!(saved, document.xml());

    // the new origin is what save writes to
    std::fs::remove_file(&path).unwrap();
    assert!(document.save());
    assert!(path.exists());
}

#[test]
fn test_save_writes_back_to_opened_file() {
    let (_dir, path) = xml_file(ENTRY_XML);
    let mut document = Document::open(&path);
    assert!(document.save());
    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.starts_with("<?xml"));
}

#[test]
fn test_save_in_memory_document_fails() {
    let mut document = parse(ENTRY_XML);
    assert!(!document.save());
    assert!(matches!(document.try_save(), Err(Error::NoOrigin)));
    assert!(document.last_error().unwrap().is_error());
}

#[test]
fn test_save_as_into_missing_directory() {
    let mut document = parse(ENTRY_XML);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("saved.xml");
    assert!(!document.save_as(&path));
    assert_eq!(document.last_error().unwrap().data, path.display().to_string());
    assert_eq!(document.origin(), None);
}

#[test]
fn test_save_as_without_tree() {
    let mut document = Document::default();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.xml");
    assert!(matches!(document.try_save_as(&path), Err(Error::NoTree)));
    assert!(!path.exists());
}

#[test]
fn test_successful_call_clears_error() {
    let mut document = parse(ENTRY_XML);
    assert!(!document.save());
    assert!(document.last_error().is_some());
    document.xml();
    assert!(document.last_error().is_none());
}

#[test]
fn test_clear_error() {
    let mut document = parse(ENTRY_XML);
    document.save();
    document.clear_error();
    assert!(document.last_error().is_none());
}
