// src/errors.rs

//! Crate-wide error taxonomy.
//!
//! Every failure in the launcher is fatal: startup either fully succeeds or
//! the process exits, because the X server's startup arguments depend on the
//! whole handshake having completed. The variants below mirror the failure
//! classes in the order they can occur during startup.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WaybridgeError {
    /// Malformed CLI input, e.g. a bad `-verbose` operand.
    #[error("usage error: {0}")]
    Usage(String),

    /// A collaborator executable is missing or not executable.
    #[error("environment error: {0}")]
    Environment(String),

    /// Socket-pair creation or a process spawn failed.
    #[error("resource error: {0}")]
    Resource(String),

    /// The output-discovery handshake with the compositor failed.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WaybridgeError>;
