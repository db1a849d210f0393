use thiserror::Error;

/// Failures surfaced by the participation state machine and the AI
/// pipeline. Each variant maps to a distinct HTTP status so clients can
/// tell "not found" from "capacity full" from "upstream text could not
/// be parsed".
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was missing or empty.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced plan, application, or participant does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Accept was attempted on a plan whose confirmed participants
    /// already equal its capacity.
    #[error("plan capacity is already full")]
    CapacityExceeded,

    /// The operation requires an identified caller and none was supplied.
    #[error("authentication required")]
    Unauthenticated,

    /// The model response contained no parseable JSON payload.
    #[error("response contained no valid JSON payload: {0}")]
    Extraction(String),

    /// The call to the generative model itself failed.
    #[error("model call failed: {0}")]
    Upstream(String),

    /// A datastore operation failed; the in-flight transaction has been
    /// rolled back.
    #[error("datastore operation failed: {0}")]
    Persistence(#[from] sqlx::Error),
}
