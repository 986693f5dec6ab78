//! Storefront CLI: generates and publishes the storefront home page.
//!
//! Fetches products from the commerce backend and content from the headless
//! CMS, renders the home page and writes it to an output directory.

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
