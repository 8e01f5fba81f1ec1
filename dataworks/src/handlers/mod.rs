//! Handlers
//!
//! Each handler is a self-contained file/data operation invoked with
//! already-bound parameters. The contract every handler honors: never panic
//! across its boundary (the dispatcher still guards), report missing input as
//! an `Err` naming the path, write exactly one output artifact on success.

mod credit_card_number;
mod email_sender;
mod format_file;
mod generate_data;
mod markdown_index;
mod recent_log_lines;
mod similar_comments;
mod sort_contacts;
mod ticket_sales;
pub(crate) mod weekday_count;

pub use credit_card_number::CreditCardNumberHandler;
pub use email_sender::EmailSenderHandler;
pub use format_file::FormatFileHandler;
pub use generate_data::GenerateDataHandler;
pub use markdown_index::MarkdownIndexHandler;
pub use recent_log_lines::RecentLogLinesHandler;
pub use similar_comments::SimilarCommentsHandler;
pub use sort_contacts::SortContactsHandler;
pub use ticket_sales::TicketSalesHandler;
pub use weekday_count::WeekdayCountHandler;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::HandlerError;
use crate::extract::SlotBindings;
use crate::oracle::Oracle;

/// Shared environment passed to every handler invocation.
#[derive(Clone)]
pub struct HandlerContext {
    pub data_root: PathBuf,
    pub oracle: Arc<dyn Oracle>,
}

impl HandlerContext {
    pub fn new(data_root: PathBuf, oracle: Arc<dyn Oracle>) -> Self {
        Self { data_root, oracle }
    }

    /// Resolve a task-text path like `/data/x` or `data/x` under the data
    /// root. Bare relative paths resolve under the root as well.
    pub fn resolve(&self, raw: &str) -> PathBuf {
        let trimmed = raw
            .trim_start_matches("./")
            .trim_start_matches('/')
            .trim_start_matches("data/");
        self.data_root.join(trimmed)
    }
}

/// Fetch a bound parameter. Missing bindings at this point are a dispatch
/// bug, but they still surface as a structured error, never a panic.
pub fn require<'a>(params: &'a SlotBindings, name: &str) -> Result<&'a str, HandlerError> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| HandlerError::Malformed(format!("no value bound for parameter '{}'", name)))
}

pub(crate) fn read_to_string(path: &Path) -> Result<String, HandlerError> {
    if !path.exists() {
        return Err(HandlerError::MissingInput(path.display().to_string()));
    }
    std::fs::read_to_string(path).map_err(HandlerError::from)
}

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, HandlerError> {
    if !path.exists() {
        return Err(HandlerError::MissingInput(path.display().to_string()));
    }
    std::fs::read(path).map_err(HandlerError::from)
}

/// Write an output artifact, creating parent directories as needed.
pub(crate) fn write_output(path: &Path, content: &str) -> Result<(), HandlerError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
