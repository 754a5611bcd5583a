//! Error types for the tagline captioning front-end.
//!
//! Errors are organized by layer: configuration loading, and the
//! caption pipeline (validation, launch, post-processing). Variants carry
//! the context a caller needs to act (paths, the launcher program, the
//! child's exit status).

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Top-level error type for tagline operations.
#[derive(Error, Debug)]
pub enum TaglineError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Caption pipeline errors
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Caption pipeline errors.
///
/// The first two variants are precondition failures: they are raised before
/// any command is assembled or any process is spawned.
#[derive(Error, Debug)]
pub enum CaptionError {
    /// No image folder was supplied
    #[error("Image folder is missing")]
    MissingSourceDir,

    /// No caption file extension was supplied
    #[error("Caption file extension is missing")]
    MissingCaptionExtension,

    /// The launcher process could not be started at all
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tagger exited with a non-zero status and the abort policy is active
    #[error("Tagger exited with {status}")]
    TaggerFailed { status: ExitStatus },

    /// A caption file could not be rewritten during post-processing
    #[error("Failed to rewrite {path}: {source}")]
    Rewrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for tagline results.
pub type Result<T> = std::result::Result<T, TaglineError>;

/// Convenience type alias for caption pipeline results.
pub type CaptionResult<T> = std::result::Result<T, CaptionError>;
