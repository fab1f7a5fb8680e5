use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ManagedObject, ObjectKind};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{code}: {message}")]
    Fault { code: String, message: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid XML: {0}")]
    Xml(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Port for an authenticated session on a management endpoint
#[async_trait]
pub trait ManagementSession: Send + Sync {
    /// Retrieve every object of `kind` in the inventory with the given property paths populated
    async fn enumerate(&self, kind: ObjectKind, properties: &[&str]) -> SessionResult<Vec<ManagedObject>>;

    /// Release the server side session
    async fn logout(&self) -> SessionResult<()>;
}
