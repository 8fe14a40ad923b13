use crate::clipboard::ContentFormat;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard does not contain {0}")]
    Empty(ContentFormat),

    #[error("clipboard backend error: {0}")]
    Backend(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClipboardError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid listen address {0:?}")]
    InvalidListen(String),

    #[error("no config directory on this system")]
    NoConfigDir,
}
