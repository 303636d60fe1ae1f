//! Crate-level error type.

/// Errors produced while talking to the recipe API, storage, or while
/// dispatching an interaction that needs state which isn't there.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote API could not be reached, timed out, or answered with
    /// something other than a recipe payload.
    #[error("network error: {0}")]
    Network(String),

    /// The remote API has no recipe under the requested identifier.
    #[error("recipe not found: {0}")]
    NotFound(String),

    /// A JSON payload (config, persisted likes, API body) was malformed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The durable key-value store rejected a read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// A recipe interaction arrived while no recipe is open.
    #[error("no recipe is currently open")]
    NoActiveRecipe,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
