//! Autoscaler error types.

use thiserror::Error;

use tickscale_core::SequenceNumber;

/// Errors surfaced by the dispatcher and per-function controllers.
///
/// Counter invariants are not represented here: a violated invariant is
/// a bug and panics.
#[derive(Debug, Error, PartialEq)]
pub enum ScalerError {
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("invalid execution time {execution_time_ms}ms for {function_id}#{sequence_number}")]
    InvalidExecutionTime {
        function_id: String,
        sequence_number: SequenceNumber,
        execution_time_ms: f64,
    },

    #[error("no dispatched request {function_id}#{sequence_number} awaiting a response")]
    UnmatchedResponse {
        function_id: String,
        sequence_number: SequenceNumber,
    },
}

pub type ScalerResult<T> = Result<T, ScalerError>;
