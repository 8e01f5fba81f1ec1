//! Normalize a markdown file in place.
//!
//! Trailing whitespace is trimmed, runs of blank lines collapse to one, a
//! heading gets a blank line around it, and the file ends with a single
//! trailing newline. The formatter version marker is only recorded in the
//! result message.

use async_trait::async_trait;

use crate::errors::HandlerError;
use crate::extract::SlotBindings;
use crate::handlers::{read_to_string, require, write_output, HandlerContext};
use crate::registry::Handler;

pub struct FormatFileHandler;

#[async_trait]
impl Handler for FormatFileHandler {
    async fn run(
        &self,
        ctx: &HandlerContext,
        params: &SlotBindings,
    ) -> Result<String, HandlerError> {
        let version = require(params, "version")?;
        let input = ctx.resolve(require(params, "input")?);

        let content = read_to_string(&input)?;
        let formatted = format_markdown(&content);
        write_output(&input, &formatted)?;

        Ok(format!("formatted {} with {}", input.display(), version))
    }
}

pub fn format_markdown(content: &str) -> String {
    let lines: Vec<&str> = content.lines().map(str::trim_end).collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    for line in lines {
        let is_heading = line.starts_with('#');
        if is_heading && out.last().map(|l| !l.is_empty()).unwrap_or(false) {
            out.push(String::new());
        }
        if line.is_empty() && out.last().map(|l| l.is_empty()).unwrap_or(true) {
            // collapse blank runs; also drops leading blanks
            continue;
        }
        out.push(line.to_string());
        if is_heading {
            out.push(String::new());
        }
    }

    while out.last().map(|l| l.is_empty()).unwrap_or(false) {
        out.pop();
    }
    let mut result = out.join("\n");
    result.push('\n');
    result
}
