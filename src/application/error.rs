use thiserror::Error;

use crate::config::ValidationError;
use crate::domain::{CommandKind, ObjectKind, RecordError};
use crate::ports::SessionError;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Connection to management endpoint failed: {0}")]
    Connection(#[from] SessionError),

    #[error("No {label} with name {name} found.", label = .kind.label())]
    NotFound { kind: ObjectKind, name: String },

    #[error("No {label} objects returned by the endpoint", label = .0.label())]
    NoObjects(ObjectKind),

    #[error("Invalid inventory record: {0}")]
    InvalidRecord(#[from] RecordError),

    #[error("{0} is not a host level command")]
    NotHostCommand(CommandKind),
}

impl CheckError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(e) => e.exit_code(),
            Self::NotFound { .. } => 1,
            Self::Connection(_) | Self::NoObjects(_) | Self::InvalidRecord(_) | Self::NotHostCommand(_) => 3,
        }
    }
}
