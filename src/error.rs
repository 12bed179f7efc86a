use std::io;

#[derive(Debug, thiserror::Error)]
pub enum MovieDbError {
    #[error("network failure: {0}")]
    Network(#[source] reqwest::Error),

    #[error("HTTP status {code}: {message}")]
    HttpStatus { code: u16, message: String },

    #[error("response is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    Render(#[source] serde_json::Error),

    #[error("refusing to send a request with an empty path")]
    EmptyPath,

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, MovieDbError>;
