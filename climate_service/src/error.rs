use thiserror::Error;

use crate::config::ConfigError;
use crate::db::DbConfigError;
use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Startup and serving failures surfaced to `main`.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Database(#[from] DbConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to start HTTP server on {address}: {reason}")]
    Server { address: String, reason: String },
}
