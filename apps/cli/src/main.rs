//! blogbook CLI: turn a list of blog posts into a single e-book.
//!
//! Pages and their images are downloaded into a temporary working set, a
//! table of contents is generated, and an external converter produces the book.

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
