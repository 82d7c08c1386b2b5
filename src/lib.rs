//! Model Binding IR - intermediate representation for generated model bindings
//!
//! Provides:
//! - Literal formatting for C++ initializers
//! - The IR entity model (fields, types, model class, module, context)
//! - Dependency ordering of type declarations
//! - Model and environment wrapper configuration
//! - Cross-validation and expansion of the environment config
//! - Metadata ingestion and the project working directory
//! - The `slx-ir` command line (feature `cli`)

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod graph;
pub mod model;
pub mod models;
pub mod validation;
pub mod workspace;

/// Version tag shared by every persisted document
pub const SCHEMA_VERSION: &str = "1.0";

pub use config::{
    EnvConfig, GymConfig, InfoSelector, InitConfig, ModelConfig, ResetConfig, RewardRange,
    SpaceConfig,
};
pub use error::{ErrorKind, IrError, IrResult};
pub use format::{
    Dtype, FormatError, Infinity, NumericValue, Scalar, format_float, format_integer,
    format_number, format_sequence, format_sequence_or_scalar,
};
pub use graph::{AdjacencyMatrix, SortError, topological_sort};
pub use model::{Metadata, build_context};
pub use models::{
    Context, DumpMode, Enumerator, Field, FieldMode, Location, Method, ModelClass, Module, Type,
    TypeContainer, TypeDef,
};
pub use workspace::{Project, RunOptions};
