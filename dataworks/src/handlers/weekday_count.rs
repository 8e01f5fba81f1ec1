//! Count the dates in a file that fall on a given weekday.
//!
//! The dates file mixes formats; each non-empty line must parse as one of the
//! four supported formats or the whole operation is an error naming the line.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::errors::HandlerError;
use crate::extract::SlotBindings;
use crate::handlers::{read_to_string, require, write_output, HandlerContext};
use crate::registry::Handler;
use crate::weekday::parse_weekday;

pub const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%b-%Y", "%b %d, %Y"];
pub const DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

pub struct WeekdayCountHandler;

#[async_trait]
impl Handler for WeekdayCountHandler {
    async fn run(
        &self,
        ctx: &HandlerContext,
        params: &SlotBindings,
    ) -> Result<String, HandlerError> {
        let weekday_name = require(params, "weekday")?;
        let weekday = parse_weekday(weekday_name).ok_or_else(|| {
            HandlerError::Malformed(format!("'{}' is not a weekday", weekday_name))
        })?;
        let input = ctx.resolve(require(params, "input")?);
        let output = ctx.resolve(require(params, "output")?);

        let content = read_to_string(&input)?;
        let mut count = 0u64;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if parse_date(line)?.weekday() == weekday {
                count += 1;
            }
        }

        write_output(&output, &count.to_string())?;
        Ok(format!(
            "counted {} {}s in {} -> {}",
            count,
            weekday_name,
            input.display(),
            output.display()
        ))
    }
}

/// Parse one line in any of the supported formats.
pub fn parse_date(line: &str) -> Result<NaiveDate, HandlerError> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(line, format) {
            return Ok(date);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(line, DATETIME_FORMAT) {
        return Ok(dt.date());
    }
    Err(HandlerError::Malformed(format!(
        "unparseable date line: '{}'",
        line
    )))
}
