//! CLI error types

use crate::error::IrError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Ir(#[from] IrError),
}

impl CliError {
    /// Message printed before exiting, with a hint where one helps
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument(_) => self.to_string(),
            CliError::Ir(err) => err.user_message(),
        }
    }
}
