//! Error taxonomy shared by the controller, the bindings and the stores.

use thiserror::Error;

/// Errors raised while opening, populating or committing a dialog.
#[derive(Debug, Error)]
pub enum Error {
    /// No record with the requested id exists.
    #[error("{entity_type} {id} was not found!")]
    NotFound { entity_type: &'static str, id: String },

    /// A binding or a caller named a field the entity type does not declare.
    #[error("{entity_type} has no field `{field}`")]
    UnknownField {
        entity_type: &'static str,
        field: String,
    },

    /// The widget's capability has no registered read/write strategy.
    #[error("Cannot handle widget {kind} with name `{widget_id}`")]
    UnsupportedWidget { widget_id: String, kind: String },

    /// A binding references a widget the surface does not provide.
    #[error("No widget named `{widget_id}` on this dialog")]
    MissingWidget { widget_id: String },

    /// Text that cannot be represented in the target field's type.
    #[error("Invalid value {value:?} for `{field}`: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Text a widget refused to display.
    #[error("Widget `{widget_id}` cannot show {value:?}: {reason}")]
    RejectedByWidget {
        widget_id: String,
        value: String,
        reason: String,
    },

    /// Contradictory construction parameters.
    #[error("Usage error: {0}")]
    Usage(String),

    /// A lifecycle call arrived in a state that does not accept it.
    #[error("Cannot {action} a dialog that is {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures of the backing store itself.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed store document: {0}")]
    Format(#[from] serde_json::Error),

    /// A write would violate a key constraint.
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(StorageError::Io(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Storage(StorageError::Format(err))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
