use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use xee_doc::{handle_error, Document, FromXPath, Node};

use crate::input::load_document;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum As {
    String,
    Number,
    Boolean,
    Integer,
    Nodes,
}

#[derive(Debug, Parser)]
pub(crate) struct Query {
    /// xpath expression
    pub(crate) xpath: String,
    /// input xml file (default stdin)
    pub(crate) infile: Option<PathBuf>,
    /// The type of value the expression is expected to produce.
    #[arg(long = "as", value_enum, default_value_t = As::String)]
    pub(crate) result_type: As,
}

impl Query {
    pub(crate) fn run(&self) -> anyhow::Result<ExitCode> {
        let mut document = load_document(self.infile.as_deref())?;
        let printed = match self.result_type {
            As::String => self.print::<String>(&mut document, |s| println!("{}", s)),
            As::Number => self.print::<f64>(&mut document, |n| println!("{}", n)),
            As::Boolean => self.print::<bool>(&mut document, |b| println!("{}", b)),
            As::Integer => self.print::<i64>(&mut document, |i| println!("{}", i)),
            As::Nodes => self.print::<Vec<Node>>(&mut document, |nodes| {
                for mut node in nodes {
                    let xml = node.xml();
                    handle_error(node.last_error());
                    println!("{}", xml);
                }
            }),
        };
        Ok(if printed {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }

    /// Evaluate the expression as `T` and print it. A warning is reported
    /// and the value still printed; an error is only reported.
    fn print<T: FromXPath>(&self, document: &mut Document, print: impl FnOnce(T)) -> bool {
        let result = document.try_xpath::<T>(&self.xpath);
        handle_error(document.last_error());
        match result {
            Ok(value) => {
                print(value);
                true
            }
            Err(_) => false,
        }
    }
}
