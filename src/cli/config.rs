//! Config command handlers

use crate::cli::ConfigInitArgs;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};

const EXAMPLE_CONFIG: &str = include_str!("../../triage.example.toml");

/// Handle `triage config init` command
///
/// Without `--force` the file is created exclusively, so an existing
/// configuration is never truncated.
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<String, Box<dyn std::error::Error>> {
    let mut options = OpenOptions::new();
    options.write(true);
    if args.force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options
        .open(&args.output)
        .map_err(|e| -> Box<dyn std::error::Error> {
            if e.kind() == ErrorKind::AlreadyExists {
                format!(
                    "File already exists: {}. Use --force to overwrite.",
                    args.output.display()
                )
                .into()
            } else {
                e.into()
            }
        })?;
    file.write_all(EXAMPLE_CONFIG.as_bytes())?;

    Ok(format!(
        "✓ Configuration file created: {}\n  Set [llm] credentials and escalation.threshold for your deployment.",
        args.output.display()
    ))
}
