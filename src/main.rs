//! tinypm CLI entry point
//!
//! This is the main executable for tinypm, a minimal npm-style package
//! manager. It handles command-line argument parsing, error display, and
//! drives the resolve → optimize → install pipeline.

use anyhow::Result;
use clap::Parser;
use tinypm::cli;
use tinypm::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // Execute the install pipeline
    match cli.execute().await {
        Ok(_) => Ok(()),
        Err(e) => {
            // Convert to user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
