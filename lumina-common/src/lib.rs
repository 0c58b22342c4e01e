//! Common types and utilities shared across Lumina crates.
//!
//! This crate defines the shared error type, the `Result` alias, and the
//! observability helpers used throughout the Lumina workspace. It is
//! intentionally lightweight so that every crate can depend on it without
//! pulling in heavy transitive costs.
//!
//! # Overview
//!
//! - [`LuminaError`] and [`Result`]: Shared error handling
//! - [`observability`]: Centralised tracing/logging initialisation

pub mod observability;

/// Error types used across the Lumina system.
#[derive(thiserror::Error, Debug)]
pub enum LuminaError {
    /// An external provider (LLM, search, OCR, vision) failed.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Caller-supplied input was missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model output could not be coerced into the expected schema.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Operation exceeded its configured timeout.
    #[error("Timeout occurred")]
    Timeout,

    /// Anything downstream that bubbled up through anyhow.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenient alias for results that use [`LuminaError`].
pub type Result<T> = std::result::Result<T, LuminaError>;
