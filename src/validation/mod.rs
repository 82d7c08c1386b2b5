//! Validation functionality
//!
//! Structural invariants are enforced where the entities are built (fields,
//! type containers, dependency order). This module holds the cross-checks
//! between the user's environment config and the model it wraps.

pub mod environment;
