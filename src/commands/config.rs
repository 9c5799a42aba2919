//! Configuration file generation subcommand.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates a configuration file with built-in defaults.
pub fn command_config(output: Option<PathBuf>, format: ConfigFormat) -> Result<()> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from("sysdash.yaml"));
    let content = render_config(&config, &format)?;

    if output.to_string_lossy() == "-" {
        print!("{content}");
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}
