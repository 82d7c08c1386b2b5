//! Init command implementation

use crate::cli::error::CliError;
use crate::config::ModelConfig;
use crate::workspace::{ENV_CONFIG_NAME, MODEL_CONFIG_NAME, MODEL_DIR, Project, suggested_names};
use std::path::Path;

/// Handle the init command
///
/// Model and class names default to the ones suggested by the directory name.
pub fn handle_init(
    workdir: &Path,
    model: Option<String>,
    class_name: Option<String>,
    namespace: Option<String>,
) -> Result<(), CliError> {
    let suggested = suggested_names(workdir);
    let model = model
        .or_else(|| suggested.as_ref().map(|(m, _)| m.clone()))
        .ok_or_else(|| {
            CliError::InvalidArgument(format!(
                "Can't derive a model name from {}, pass --model",
                workdir.display()
            ))
        })?;
    let class_name = class_name.unwrap_or_else(|| format!("{}ModelClass", model));
    let namespace = namespace.unwrap_or_default();

    let config = ModelConfig::new(&model, &class_name, &namespace);
    let project = Project::init(workdir, &config)?;

    println!("Initialized project {} in {}", model, project.workdir().display());
    println!("  {}", MODEL_CONFIG_NAME);
    println!("  {}", ENV_CONFIG_NAME);
    println!(
        "Place the exported model sources and metadata.json under {}/",
        MODEL_DIR
    );
    Ok(())
}
