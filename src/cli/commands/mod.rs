//! Command implementations

pub mod frontend;
pub mod init;
pub mod inspect;
