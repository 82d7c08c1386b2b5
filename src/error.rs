//! Error types for IR construction and validation
//!
//! Every failure is fatal for a generation run. Variants are grouped by
//! [`ErrorKind`] so callers can report schema, structural, configuration and
//! formatting problems differently.

use crate::format::FormatError;
use crate::graph::SortError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building, validating or persisting the IR
#[derive(Error, Debug)]
pub enum IrError {
    /// Document version tag does not match [`crate::SCHEMA_VERSION`]
    #[error("{document} version incompatible: expected {expected}, found {found}")]
    VersionMismatch {
        document: String,
        expected: String,
        found: String,
    },

    /// Field mode, shape and type presence disagree
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Unsupported field kind '{0}': no {0} class support yet")]
    UnsupportedFieldKind(String),

    #[error("Unknown field kind '{kind}' (is_array: {is_array})")]
    UnknownFieldKind { kind: String, is_array: bool },

    #[error("Invalid type '{name}': {reason}")]
    InvalidType { name: String, reason: String },

    /// Two types share a qualified identity
    #[error("Duplicate type declaration '{0}'")]
    DuplicateType(String),

    #[error("Can't find type '{0}'")]
    TypeNotFound(String),

    #[error("Field '{field}' of type '{owner}' references undeclared type '{target}'")]
    UnresolvedTypeReference {
        owner: String,
        field: String,
        target: String,
    },

    #[error("Circular type reference among: {}", .types.join(", "))]
    CircularDependency { types: Vec<String> },

    #[error(transparent)]
    Sort(#[from] SortError),

    #[error("{0}")]
    NotImplemented(String),

    /// The model lacks a struct the environment wrapper cannot work without
    #[error("{message}")]
    MissingTypeMapping { role: String, message: String },

    #[error("{role} key '{key}' not found in {type_name}")]
    KeyNotFound {
        role: String,
        key: String,
        type_name: String,
    },

    #[error("Environment init parameter '{key}' not found in {type_name}")]
    ParameterNotFound { key: String, type_name: String },

    #[error("Type {type_name} must have at least {required} fields, found {actual}")]
    TooFewFields {
        type_name: String,
        required: usize,
        actual: usize,
    },

    #[error("Invalid initializer for '{field}': {reason}")]
    IncompatibleInit { field: String, reason: String },

    #[error("Invalid {role} space: {reason}")]
    InvalidSpace { role: String, reason: String },

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// The working directory is not usable for the requested step
    #[error("Workspace {}: {reason}", .path.display())]
    Workspace { path: PathBuf, reason: String },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("IO error with {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for IR operations
pub type IrResult<T> = Result<T, IrError>;

/// Coarse classification of an [`IrError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Schema version mismatch, no migration is attempted
    VersionMismatch,
    /// Broken IR invariant (modes, duplicates, cycles, unsupported features)
    Structural,
    /// Mistake in a user configuration document
    Configuration,
    /// A literal could not be rendered for its dtype
    Format,
    /// A document could not be parsed at all
    Parse,
    Io,
}

impl IrError {
    pub fn version_mismatch(
        document: impl Into<String>,
        expected: impl Into<String>,
        found: Option<&str>,
    ) -> Self {
        Self::VersionMismatch {
            document: document.into(),
            expected: expected.into(),
            found: found.unwrap_or("<missing>").to_string(),
        }
    }

    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn incompatible_init(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IncompatibleInit {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            IrError::VersionMismatch { .. } => ErrorKind::VersionMismatch,
            IrError::InvalidField { .. }
            | IrError::UnsupportedFieldKind(_)
            | IrError::UnknownFieldKind { .. }
            | IrError::InvalidType { .. }
            | IrError::DuplicateType(_)
            | IrError::TypeNotFound(_)
            | IrError::UnresolvedTypeReference { .. }
            | IrError::CircularDependency { .. }
            | IrError::Sort(_)
            | IrError::NotImplemented(_) => ErrorKind::Structural,
            IrError::MissingTypeMapping { .. }
            | IrError::KeyNotFound { .. }
            | IrError::ParameterNotFound { .. }
            | IrError::TooFewFields { .. }
            | IrError::IncompatibleInit { .. }
            | IrError::InvalidSpace { .. }
            | IrError::InvalidConfig(_)
            | IrError::Workspace { .. } => ErrorKind::Configuration,
            IrError::Format(_) => ErrorKind::Format,
            IrError::Json(_) | IrError::Toml(_) | IrError::TomlSerialize(_) => ErrorKind::Parse,
            IrError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            IrError::VersionMismatch { .. } => format!(
                "{self}\n\nHint: Regenerate the document with a matching tool version; documents are never migrated."
            ),
            IrError::KeyNotFound { .. } | IrError::ParameterNotFound { .. } => format!(
                "{self}\n\nHint: Check the spelling against the field names listed in the model metadata."
            ),
            IrError::IncompatibleInit { .. } => format!(
                "{self}\n\nHint: Use a \"custom\" initializer for struct parameters and flatten array bounds to one dimension."
            ),
            IrError::TooFewFields { .. } => format!(
                "{self}\n\nHint: The gym wrapper needs separate outports for observation, reward and done."
            ),
            IrError::Workspace { .. } => format!(
                "{self}\n\nHint: Run `init` in an empty directory first, then place the exported model files next to model.toml."
            ),
            IrError::InvalidConfig(_) => format!(
                "{self}\n\nHint: Compare the document with the one written by `init`; parameter initializers are tagged \"seed\", \"constant\", \"uniform\" or \"custom\"."
            ),
            IrError::CircularDependency { .. } | IrError::Sort(_) => format!(
                "{self}\n\nHint: Nested structs must not reference each other by value."
            ),
            _ => self.to_string(),
        }
    }
}
