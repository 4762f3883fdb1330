/// Error taxonomy shared by the booking engine and the persistence layer.
///
/// Every rejected write carries enough detail for the caller to correct the
/// request (e.g. the valid row/seat range for the flight's airplane).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("an order must contain at least one ticket")]
    EmptyOrder,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("internal error: {0}")]
    Internal(String),
}
