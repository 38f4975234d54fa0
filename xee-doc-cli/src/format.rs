use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::input::load_document;

#[derive(Debug, Parser)]
pub(crate) struct Format {
    /// input xml file (default stdin)
    pub(crate) infile: Option<PathBuf>,
    /// output xml file (default stdout)
    pub(crate) outfile: Option<PathBuf>,
}

impl Format {
    pub(crate) fn run(&self) -> anyhow::Result<()> {
        let mut document = load_document(self.infile.as_deref())?;
        if let Some(outfile) = &self.outfile {
            document
                .try_save_as(outfile)
                .with_context(|| format!("Failed to write {}", outfile.display()))?;
        } else {
            print!("{}", document.try_xml()?);
        }
        Ok(())
    }
}
