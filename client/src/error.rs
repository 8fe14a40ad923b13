#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The host rejected the command; the message is the host's, untouched.
    #[error("{0}")]
    Host(String),

    #[error("invalid host url: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to connect to clipboard host: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("connection to clipboard host closed")]
    Closed,

    #[error("unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
