//! Frontend command implementation

use crate::cli::error::CliError;
use crate::workspace::{PROJECT_DEBUG_IR_NAME, PROJECT_IR_NAME, Project, RunOptions};
use std::path::Path;

/// Handle the frontend command
pub fn handle_frontend(workdir: &Path, options: RunOptions) -> Result<(), CliError> {
    let project = Project::open(workdir)?;
    let context = project.frontend(options)?;

    let module = &context.module;
    println!(
        "Built IR for {} ({} types, {} sources)",
        module.name,
        module.types.len(),
        context.sources.len()
    );
    println!("  {}", project.path(PROJECT_IR_NAME).display());
    if options.debug {
        println!("  {}", project.path(PROJECT_DEBUG_IR_NAME).display());
    }
    Ok(())
}
