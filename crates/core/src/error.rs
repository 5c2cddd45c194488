//! Error types for the boxmatch pattern engine.

use thiserror::Error;

/// Primary error type for layout model construction and matcher control.
///
/// Pattern discovery itself is best-effort and reports trouble through
/// logging; these variants cover API misuse and malformed input.
#[derive(Error, Debug)]
pub enum MineError {
    #[error("unknown area id: {0}")]
    UnknownArea(u32),

    #[error("unknown relation: {0}")]
    UnknownRelation(String),

    #[error("unknown tag: {0}")]
    UnknownTag(String),

    #[error("invalid parameter {name}: {msg}")]
    InvalidParam { name: &'static str, msg: String },

    #[error("configuration index {index} out of range ({len} configurations)")]
    InvalidConfigurationIndex { index: usize, len: usize },

    #[error("matcher has not been configured")]
    NotConfigured,

    #[error("no configuration selected")]
    NoConfigurationSelected,

    #[error("dependency matcher for {0} has no selected configuration")]
    DependencyNotReady(String),

    #[error("invalid tagger pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for MineError.
pub type Result<T> = std::result::Result<T, MineError>;
