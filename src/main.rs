//! doclinks CLI
//!
//! Checks that links in markdown documents resolve to existing files and
//! headings. External URLs are never fetched.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

use doclinks::check_links::{run_check_links, CheckArgs};
use doclinks::list_links::{run_list_links, ListLinksArgs};

#[derive(Parser)]
#[command(name = "doclinks")]
#[command(author = "RoyalBit Inc.")]
#[command(version)]
#[command(about = "Find broken local links in markdown documents")]
#[command(long_about = "Finds links to moved, renamed or deleted files and retitled headings.\n\nCommands:\n  check    Check links in every markdown file under a directory\n  links    List the links found in one markdown file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check links in every markdown file under a directory
    Check(CheckArgs),
    /// List the links found in one markdown file (JSON lines)
    Links(ListLinksArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => run_check_links(args).await,
        Commands::Links(args) => run_list_links(args).await.map(|()| ExitCode::SUCCESS),
    }
}
