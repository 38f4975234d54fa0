// disable dead code warning for this module as not every test file uses
// every helper
#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;
use xee_doc::Document;

pub(crate) const ENTRY_XML: &str =
    r#"<Root><EntryType name="demo"><Comment>hi</Comment></EntryType></Root>"#;

pub(crate) const LIST_XML: &str = r#"<list><item n="1">a</item><item n="2">b</item><item n="3">c</item></list>"#;

/// Write `xml` to a file in a fresh temporary directory.
pub(crate) fn xml_file(xml: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.xml");
    std::fs::write(&path, xml).unwrap();
    (dir, path)
}

/// Parse `xml`, failing the test when parsing fails.
pub(crate) fn parse(xml: &str) -> Document {
    let document = Document::parse(xml);
    assert!(document.last_error().is_none(), "{:?}", document.last_error());
    document
}
