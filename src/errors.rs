use serde::Serialize;
use uuid::Uuid;

use crate::models::WorkOrderStatus;

/// Errors returned by the work order core. All of these are recoverable:
/// the caller keeps its entity unchanged and may surface the message to the
/// user.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Invalid transition: cannot {action} a work order in status {from}")]
    InvalidTransition {
        from: WorkOrderStatus,
        action: &'static str,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Concurrent modification: work order {0} already has a transition in flight")]
    ConcurrentModification(Uuid),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_message_names_status_and_action() {
        let err = ServiceError::InvalidTransition {
            from: WorkOrderStatus::Completed,
            action: "start",
        };
        assert_eq!(
            err.to_string(),
            "Invalid transition: cannot start a work order in status completed"
        );
    }
}
