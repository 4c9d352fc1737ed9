//! Failure taxonomy for the poll cycle.
//!
//! Every way a cycle can go wrong is one of these kinds. The watch loop
//! catches all of them at the cycle boundary and converts each into a
//! single operator-facing notification.

use thiserror::Error;

/// Errors a single poll cycle can produce, from the outbound request
/// through status interpretation.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The request never completed: connection failure, timeout, or an
    /// unreadable body.
    #[error("review API request failed: {0}")]
    Transport(String),

    /// The response body was not valid JSON.
    #[error("review API returned an undecodable body: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The response body carried an explicit error marker from the server.
    #[error("review API reported an error ({code}): {detail}")]
    Remote { code: String, detail: String },

    /// The response carried a non-success HTTP status and no error marker.
    #[error("review API returned HTTP {0}")]
    UnsuccessfulResponse(u16),

    /// The decoded payload did not match the expected envelope or item shape.
    #[error("response shape mismatch: {0}")]
    Schema(String),

    /// A work item carried a status code outside the known vocabulary.
    #[error("unknown review status \"{0}\"")]
    UnknownStatus(String),
}
