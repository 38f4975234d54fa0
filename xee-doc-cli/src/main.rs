mod demo;
mod format;
mod input;
mod query;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the project title and comments of an entry file.
    Demo(demo::Demo),
    /// Evaluate a typed xpath expression on an xml document.
    Query(query::Query),
    /// Format an xml document with indentation and an XML declaration.
    Format(format::Format),
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Demo(demo) => demo.run(),
        Commands::Query(query) => query.run(),
        Commands::Format(format) => {
            format.run()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
