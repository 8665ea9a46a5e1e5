//! Application error type

use crate::app::cli::api::ConfigError;
use crate::core::error_handling::ContextualError;
use crate::queue::api::QueueError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("Logging initialisation failed: {message}")]
    Logging { message: String },

    #[error("Failed to start worker thread '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker thread '{name}' panicked")]
    WorkerPanicked { name: String },
}

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        match self {
            AppError::Config(e) => e.is_user_actionable(),
            AppError::Queue(e) => e.is_user_actionable(),
            _ => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Queue(e) => e.user_message(),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
