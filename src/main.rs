//! # photo-duplicates CLI
//!
//! Command-line interface for the duplicate photo finder.
//!
//! ## Usage
//! ```bash
//! photo-duplicates scan ~/Photos --threshold 8
//! photo-duplicates scan ~/Photos --verbose --output json
//! ```

mod cli;

use console::style;
use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
