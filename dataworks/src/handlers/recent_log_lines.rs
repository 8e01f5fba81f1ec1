//! Write the first line of the 10 most recently modified log files,
//! most recent first.

use std::path::PathBuf;
use std::time::SystemTime;

use async_trait::async_trait;

use crate::errors::HandlerError;
use crate::extract::SlotBindings;
use crate::handlers::{require, write_output, HandlerContext};
use crate::registry::Handler;

const MOST_RECENT: usize = 10;

pub struct RecentLogLinesHandler;

#[async_trait]
impl Handler for RecentLogLinesHandler {
    async fn run(
        &self,
        ctx: &HandlerContext,
        params: &SlotBindings,
    ) -> Result<String, HandlerError> {
        let input = ctx.resolve(require(params, "input")?);
        let output = ctx.resolve(require(params, "output")?);

        if !input.is_dir() {
            return Err(HandlerError::MissingInput(input.display().to_string()));
        }

        let mut logs: Vec<(SystemTime, PathBuf)> = Vec::new();
        for entry in std::fs::read_dir(&input)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e == "log").unwrap_or(false) {
                let modified = entry.metadata()?.modified()?;
                logs.push((modified, path));
            }
        }

        if logs.is_empty() {
            return Err(HandlerError::Malformed(format!(
                "no .log files in {}",
                input.display()
            )));
        }

        logs.sort_by(|a, b| b.0.cmp(&a.0));
        logs.truncate(MOST_RECENT);

        let mut lines = Vec::with_capacity(logs.len());
        for (_, path) in &logs {
            let content = std::fs::read_to_string(path)?;
            lines.push(content.lines().next().unwrap_or_default().to_string());
        }

        let taken = logs.len();
        write_output(&output, &format!("{}\n", lines.join("\n")))?;
        Ok(format!(
            "wrote first lines of {} most recent logs from {} -> {}",
            taken,
            input.display(),
            output.display()
        ))
    }
}
