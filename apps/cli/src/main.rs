//! fomc-corpus CLI: build text corpora of FOMC communications.
//!
//! Crawls the Federal Reserve site for statements, minutes, transcripts,
//! speeches and testimony, and writes each collection as JSON plus one text
//! file per document.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
