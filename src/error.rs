// src/error.rs

//! Error types for pkgforge
//!
//! Encoding failures abort the current build. Validation failures are
//! collected by the generators so every problem can be reported at once.

use thiserror::Error;

use crate::compression::CompressionError;
use crate::manifest::ManifestError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A package definition that the target format cannot represent
    #[error("{0}")]
    Validation(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error(transparent)]
    Compression(#[from] CompressionError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

pub type Result<T> = std::result::Result<T, Error>;
