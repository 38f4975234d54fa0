use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use xee_doc::{handle_error, Document, ErrorRecord, Level, Node};

#[derive(Debug, Parser)]
pub(crate) struct Demo {
    /// xml file with EntryType elements
    #[arg(short = 'x', long = "xml")]
    pub(crate) xml: PathBuf,
}

impl Demo {
    pub(crate) fn run(&self) -> anyhow::Result<ExitCode> {
        if !self.xml.exists() {
            let record = ErrorRecord::new(
                Level::Error,
                "File does not exist!",
                self.xml.display().to_string(),
            );
            handle_error(Some(&record));
            return Ok(ExitCode::FAILURE);
        }

        let mut document = Document::open(&self.xml);
        handle_error(document.last_error());

        let title: String = document.xpath("string((//EntryType/@name)[1])");
        handle_error(document.last_error());
        println!("Project Title: {}", title);

        let comments: Vec<Node> = document.xpath("//EntryType/Comment");
        handle_error(document.last_error());
        for mut comment in comments {
            let xml = comment.xml();
            handle_error(comment.last_error());
            println!("Comment: {}", xml);
        }
        Ok(ExitCode::SUCCESS)
    }
}
