//! DataWorks agent library.
//!
//! Accepts a free-text task description, classifies it into one of ten fixed
//! operation kinds through an external language-model oracle, extracts
//! operation parameters from the raw text by heuristic scanning, and
//! dispatches to a handler performing a concrete file/data transformation
//! against a local data root.
//!
//! Pipeline: raw text -> [`dispatch::Dispatcher`] -> [`classifier`] label ->
//! [`registry`] lookup -> [`extract`] slot binding -> handler -> normalized
//! outcome.

pub mod classifier;
pub mod config;
pub mod datagen;
pub mod dispatch;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod labels;
pub mod oracle;
pub mod registry;
pub mod server;
pub mod weekday;

pub use config::{AgentConfig, OracleConfig};
pub use dispatch::{Dispatcher, ErrorKind, OperationOutcome, OutcomeStatus};
pub use labels::OperationLabel;
pub use server::Agent;
