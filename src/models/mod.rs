//! IR entity model
//!
//! The entity graph handed to the binding renderer: fields and enumerators,
//! struct/enum types in a [`TypeContainer`], the [`ModelClass`], the [`Module`]
//! that owns both, and the root [`Context`] document.

pub mod context;
pub mod field;
pub mod field_mode;
pub mod model_class;
pub mod module;
pub mod roles;
pub mod types;

pub use context::{Context, DumpMode};
pub use field::{Enumerator, Field};
pub use field_mode::FieldMode;
pub use model_class::{Method, ModelClass};
pub use module::Module;
pub use roles::{Role, describe_field};
pub use types::{Location, SortOrder, Type, TypeContainer, TypeDef, TypeMembers};
