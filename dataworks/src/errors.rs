//! Error taxonomy for the agent.
//!
//! Every failure is caught at the boundary nearest its origin and converted to
//! a structured outcome; nothing here is fatal to the process.

use thiserror::Error;

/// Transport-level failure talking to an oracle. Never crosses the gateway
/// boundary: the classifier degrades to `Undetermined`, the weekday resolver
/// to `None`, and handlers convert it into a handler error.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle credential missing (set the configured API key variable)")]
    MissingCredential,

    #[error("oracle request failed: {0}")]
    Http(String),

    #[error("oracle returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse oracle response: {0}")]
    Parse(String),
}

/// Failure inside a handler. Converted by the dispatcher into an error
/// outcome with kind `handler`.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("missing input file: {0}")]
    MissingInput(String),

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("oracle call failed: {0}")]
    Oracle(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<OracleError> for HandlerError {
    fn from(e: OracleError) -> Self {
        HandlerError::Oracle(e.to_string())
    }
}

impl From<std::io::Error> for HandlerError {
    fn from(e: std::io::Error) -> Self {
        HandlerError::Io(e.to_string())
    }
}

/// The dispatcher's failure taxonomy. Each variant maps 1:1 onto an
/// `error_kind` value in the outward result envelope.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("classification failed: {0}")]
    Classification(String),

    #[error("parameter extraction incomplete: missing {}", .missing.join(", "))]
    Extraction { missing: Vec<String> },

    #[error("{0}")]
    Handler(String),
}
