//! Error types for the `paste_sanitizer` crate.
//!
//! The sanitization pipeline itself never fails; these errors only surface at
//! the edges: building a whitelist, driving a [`PasteSession`](crate::PasteSession)
//! out of order, or a host sink refusing the final markup.

/// All errors that can occur around a paste operation.
#[derive(Debug, thiserror::Error)]
pub enum PasteError {
    /// The whitelist configuration contains an unusable name.
    #[error("Config error: {0}")]
    Config(String),

    /// A session operation was called while no capture was active.
    #[error("No paste capture in progress")]
    NotCapturing,

    /// The host's insertion sink failed to accept the chosen markup.
    #[error("Paste sink failed: {0}")]
    Sink(Box<dyn std::error::Error + Send + Sync>),
}

/// A type alias for `Result<T, PasteError>`.
pub type Result<T> = std::result::Result<T, PasteError>;
