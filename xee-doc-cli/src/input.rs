use std::io;
use std::path::Path;

use anyhow::Context;
use xee_doc::Document;

/// Load the document named on the command line, or read it from stdin.
///
/// A document loaded from a file keeps the file as its origin.
pub(crate) fn load_document(infile: Option<&Path>) -> anyhow::Result<Document> {
    let document = match infile {
        Some(path) => Document::try_open(path)?,
        None => {
            let xml = io::read_to_string(io::stdin()).context("Failed to read XML from stdin")?;
            Document::try_parse(&xml).context("Failed to parse XML from stdin")?
        }
    };
    Ok(document)
}
