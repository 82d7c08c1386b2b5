//! Model ingestion
//!
//! Reads the exporter's metadata document and turns it, together with the user
//! configuration, into a validated [`crate::models::Context`].

pub mod builder;
pub mod metadata;

pub use builder::{build_context, default_headers};
pub use metadata::{Metadata, MetadataMember, MetadataModelClass, MetadataStruct};
