use thiserror::Error;

/// Text stored for every non-2xx answer from the user endpoint.
pub const NOT_FOUND_MESSAGE: &str = "User not found";

/// Stored when a failure carries no message of its own.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// The two classes of lookup failure the UI distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Transport,
}

#[derive(Debug, Error)]
pub enum LookupError {
    /// Any non-success status. The code is kept for logs only.
    #[error("User not found")]
    NotFound { status: u16 },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
    /// Failure reported by a profile source that is not the HTTP client.
    #[error("{0}")]
    Other(String),
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Transport(_) | Self::Decode(_) | Self::Other(_) => ErrorKind::Transport,
        }
    }

    /// The text stored in the lookup state for this failure.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to write theme file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode theme preference: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}
