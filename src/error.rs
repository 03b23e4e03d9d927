use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("auth error: {0}")]
    Auth(String),
    #[error("gmail api error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected api response: {0}")]
    Decode(String),
    #[error("attachment not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl AppError {
    /// Rewrites the human-readable text of message-carrying variants.
    pub fn map_message(self, f: impl Fn(&str) -> String) -> Self {
        match self {
            AppError::Config(message) => AppError::Config(f(&message)),
            AppError::Auth(message) => AppError::Auth(f(&message)),
            AppError::Api { status, message } => AppError::Api {
                status,
                message: f(&message),
            },
            AppError::Transport(message) => AppError::Transport(f(&message)),
            AppError::Decode(message) => AppError::Decode(f(&message)),
            AppError::InvalidInput(message) => AppError::InvalidInput(f(&message)),
            other => other,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AppError::Transport(format!("request timed out: {err}"));
        }
        AppError::Transport(err.to_string())
    }
}
