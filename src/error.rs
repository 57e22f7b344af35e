//! Error taxonomy for the suggestion pipeline.
//!
//! Only genuine transport failures propagate to callers. Parsing and
//! reconciliation irregularities degrade to "fewer or no suggestions"
//! inside the pipeline and never surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The inference endpoint could not be reached or returned a
    /// non-success status. The caller may retry the whole analysis.
    #[error("cannot reach the assistant service: {message}")]
    Transport { message: String },

    /// The transport succeeded but the reply carried no usable text field.
    /// Propagated identically to `Transport`.
    #[error("invalid response from the assistant service: {message}")]
    InvalidResponse { message: String },

    /// Settings could not be read from or written to disk.
    #[error("settings error: {message}")]
    Config { message: String },
}

impl Error {
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Error::InvalidResponse {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
