//! links command: Dump the links found in one document
//!
//! One compact JSON object per link, in the order they were found.

use crate::extract::Extractor;
use crate::schema::LinkOccurrence;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ListLinksArgs {
    /// Markdown file to extract links from
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

pub async fn run_list_links(args: ListLinksArgs) -> Result<()> {
    let content = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read file: {}", args.file.display()))?;

    let links = list_links(&content)?;
    for link in &links {
        println!("{}", serde_json::to_string(link)?);
    }

    eprintln!("Found {} links in {}", links.len(), args.file.display());
    Ok(())
}

pub fn list_links(content: &str) -> Result<Vec<LinkOccurrence>> {
    let extractor = Extractor::new()?;
    Ok(extractor.extract(content).collect())
}
