//! Inspect command implementation

use crate::cli::error::CliError;
use crate::cli::output::{format_compact_output, format_pretty_output};
use crate::models::DumpMode;
use crate::workspace::Project;
use std::path::Path;

/// Handle the inspect command
///
/// Reads the IR of the last frontend run. `format` is one of `compact`,
/// `pretty` or `json`.
pub fn handle_inspect(workdir: &Path, format: &str) -> Result<(), CliError> {
    let project = Project::open(workdir)?;
    let context = project.load_context()?;

    let output = match format {
        "compact" => format_compact_output(&context)?,
        "pretty" => format_pretty_output(&context)?,
        "json" => context.dump(DumpMode::Debug)?,
        _ => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown format: {}",
                format
            )));
        }
    };

    println!("{}", output);
    Ok(())
}
