//! Error types for kana

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// kana error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing startup parameter
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parse error
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Image encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Malformed command datagram
    #[error("Invalid datagram: {0}")]
    InvalidDatagram(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
