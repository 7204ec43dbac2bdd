use formats::FormatError;
use scene::ZoneError;

use crate::transport::TransportError;

/// Failure of one user action, reported at the editor boundary.
#[derive(Debug)]
pub enum EditorError {
    /// Malformed document or zone data. Nothing was changed.
    Format(String),
    /// Name already taken. An open edit session stays open.
    Conflict { name: String },
    /// Stale reference to a zone that is gone.
    NotFound { name: String },
    /// Session operation for a zone that is not being edited.
    NotEditing { name: String },
    Transport(TransportError),
}

impl EditorError {
    pub fn kind(&self) -> &'static str {
        match self {
            EditorError::Format(_) => "format",
            EditorError::Conflict { .. } => "conflict",
            EditorError::NotFound { .. } => "not_found",
            EditorError::NotEditing { .. } => "not_editing",
            EditorError::Transport(_) => "transport",
        }
    }

    /// Errors from superseded references; logged and otherwise ignored.
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            EditorError::NotFound { .. } | EditorError::NotEditing { .. }
        )
    }
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorError::Format(msg) => write!(f, "invalid zones: {msg}"),
            EditorError::Conflict { name } => write!(f, "a zone named \"{name}\" already exists"),
            EditorError::NotFound { name } => write!(f, "zone \"{name}\" no longer exists"),
            EditorError::NotEditing { name } => write!(f, "zone \"{name}\" is not being edited"),
            EditorError::Transport(err) => write!(f, "transport error: {err}"),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ZoneError> for EditorError {
    fn from(err: ZoneError) -> Self {
        match err {
            ZoneError::Format(msg) => EditorError::Format(msg),
            ZoneError::Conflict { name } => EditorError::Conflict { name },
            ZoneError::NotFound { name } => EditorError::NotFound { name },
            ZoneError::NotEditing { name } => EditorError::NotEditing { name },
        }
    }
}

impl From<FormatError> for EditorError {
    fn from(err: FormatError) -> Self {
        EditorError::Format(err.to_string())
    }
}

impl From<TransportError> for EditorError {
    fn from(err: TransportError) -> Self {
        EditorError::Transport(err)
    }
}
