//! Project working directory
//!
//! A project directory holds the two user configuration documents, the
//! exporter's metadata and generated sources under `model/`. The frontend step
//! turns them into the IR document next to them.

use crate::config::{EnvConfig, ModelConfig};
use crate::config::model::{is_valid_cpp_identifier, is_valid_model_name};
use crate::error::IrError;
use crate::model::{Metadata, build_context, default_headers};
use crate::models::{Context, DumpMode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const MODEL_CONFIG_NAME: &str = "model.toml";
pub const ENV_CONFIG_NAME: &str = "env.toml";
pub const METADATA_NAME: &str = "metadata.json";
pub const PROJECT_IR_NAME: &str = "project.json";
pub const PROJECT_DEBUG_IR_NAME: &str = "project.debug.json";
pub const MODEL_DIR: &str = "model";

/// Generated sources, relative to the model directory; one level of nesting
/// covers the per-library folders of physical models
const SOURCE_PATTERNS: [&str; 3] = ["*.cpp", "*.c", "*/*.c"];

/// Options threaded through a frontend run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Also write the debug IR with derived fields
    pub debug: bool,
}

/// Names suggested for a new project in `workdir`
///
/// The directory name is used for the model and `<name>ModelClass` for the class
/// when it is a valid model name.
pub fn suggested_names(workdir: &Path) -> Option<(String, String)> {
    let name = workdir.file_name()?.to_str()?;
    if is_valid_model_name(name) && is_valid_cpp_identifier(name) {
        Some((name.to_string(), format!("{}ModelClass", name)))
    } else {
        None
    }
}

/// A project working directory
#[derive(Debug, Clone)]
pub struct Project {
    workdir: PathBuf,
}

impl Project {
    /// Open an initialized project
    pub fn open(workdir: impl Into<PathBuf>) -> Result<Self, IrError> {
        let project = Self {
            workdir: workdir.into(),
        };
        if !project.path(MODEL_CONFIG_NAME).is_file() {
            return Err(project.workspace_error(format!(
                "not a project directory, {} is missing",
                MODEL_CONFIG_NAME
            )));
        }
        Ok(project)
    }

    /// Write default configuration documents into a new project directory
    ///
    /// The directory may be missing or empty; a directory with content is rejected.
    pub fn init(workdir: impl Into<PathBuf>, model_config: &ModelConfig) -> Result<Self, IrError> {
        let project = Self {
            workdir: workdir.into(),
        };
        project.check_initializable()?;
        model_config.validate()?;

        fs::create_dir_all(&project.workdir).map_err(|e| IrError::io(&project.workdir, e))?;
        write_text(&project.path(MODEL_CONFIG_NAME), &model_config.to_toml_string()?)?;
        write_text(&project.path(ENV_CONFIG_NAME), &EnvConfig::default().to_toml_string()?)?;

        info!(
            "Initialized project for model {} in {}",
            model_config.model,
            project.workdir.display()
        );
        Ok(project)
    }

    fn check_initializable(&self) -> Result<(), IrError> {
        if !self.workdir.exists() {
            return Ok(());
        }
        if !self.workdir.is_dir() {
            return Err(self.workspace_error("expected a directory".to_string()));
        }
        let mut entries = fs::read_dir(&self.workdir).map_err(|e| IrError::io(&self.workdir, e))?;
        if entries.next().is_none() {
            return Ok(());
        }
        if self.path(MODEL_CONFIG_NAME).is_file() {
            Err(self.workspace_error("already initialized as a project, choose another path".to_string()))
        } else {
            Err(self.workspace_error("has content, expected an empty directory".to_string()))
        }
    }

    fn workspace_error(&self, reason: String) -> IrError {
        IrError::Workspace {
            path: self.workdir.clone(),
            reason,
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.workdir.join(name)
    }

    pub fn model_dir(&self) -> PathBuf {
        self.path(MODEL_DIR)
    }

    pub fn load_model_config(&self) -> Result<ModelConfig, IrError> {
        ModelConfig::from_toml_str(&read_text(&self.path(MODEL_CONFIG_NAME))?)
    }

    pub fn load_env_config(&self) -> Result<EnvConfig, IrError> {
        EnvConfig::from_toml_str(&read_text(&self.path(ENV_CONFIG_NAME))?)
    }

    pub fn load_metadata(&self) -> Result<Metadata, IrError> {
        Metadata::from_json_str(&read_text(&self.path(METADATA_NAME))?)
    }

    /// Load the IR written by the last frontend run
    pub fn load_context(&self) -> Result<Context, IrError> {
        Context::load(&read_text(&self.path(PROJECT_IR_NAME))?)
    }

    /// Model sources relative to the model directory, with forward slashes
    pub fn discover_sources(&self) -> Result<Vec<String>, IrError> {
        let model_dir = self.model_dir();
        let mut sources = Vec::new();
        for pattern in SOURCE_PATTERNS {
            let full_pattern = format!(
                "{}/{}",
                glob::Pattern::escape(&model_dir.to_string_lossy()),
                pattern
            );
            let entries = glob::glob(&full_pattern)
                .map_err(|e| IrError::InvalidConfig(format!("{}: {}", pattern, e)))?;
            for entry in entries {
                match entry {
                    Ok(path) if path.is_file() => {
                        if let Ok(relative) = path.strip_prefix(&model_dir) {
                            sources.push(relative.to_string_lossy().replace('\\', "/"));
                        }
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Error accessing path: {}", e),
                }
            }
        }
        debug!("Discovered {} model sources", sources.len());
        Ok(sources)
    }

    /// Build the IR from the project documents and write it
    ///
    /// The concise IR always goes to `project.json`; with `options.debug` the full
    /// document is also written to `project.debug.json`.
    pub fn frontend(&self, options: RunOptions) -> Result<Context, IrError> {
        let model_config = self.load_model_config()?;
        let env_config = self.load_env_config()?;
        let metadata = self.load_metadata()?;
        let sources = self.discover_sources()?;
        let headers = default_headers(&metadata.name);

        let context = build_context(&metadata, &model_config, env_config, sources, headers)?;

        write_text(&self.path(PROJECT_IR_NAME), &context.dump(DumpMode::Concise)?)?;
        if options.debug {
            write_text(&self.path(PROJECT_DEBUG_IR_NAME), &context.dump(DumpMode::Debug)?)?;
        }
        info!("Wrote IR to {}", self.path(PROJECT_IR_NAME).display());
        Ok(context)
    }
}

fn read_text(path: &Path) -> Result<String, IrError> {
    fs::read_to_string(path).map_err(|e| IrError::io(path, e))
}

fn write_text(path: &Path, text: &str) -> Result<(), IrError> {
    fs::write(path, text).map_err(|e| IrError::io(path, e))
}
