use crate::concert::ConcertStatus;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: ConcertStatus,
        to: ConcertStatus,
    },

    #[error("Conflict: {0}")]
    Conflict(String),
}
