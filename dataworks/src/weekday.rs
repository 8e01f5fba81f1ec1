//! Weekday Resolver
//!
//! The task text may name a weekday in any language, so canonicalization goes
//! through the oracle. Only the seven English names (case-insensitive) are
//! accepted back; anything else resolves to `None`.

use std::sync::Arc;

use chrono::Weekday;
use tracing::warn;

use crate::oracle::Oracle;

pub struct WeekdayResolver {
    oracle: Arc<dyn Oracle>,
}

impl WeekdayResolver {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn resolve(&self, task: &str) -> Option<Weekday> {
        match self.oracle.translate_weekday(task).await {
            Ok(raw) => {
                let name = raw.trim().to_lowercase();
                let resolved = parse_weekday(&name);
                if resolved.is_none() {
                    warn!(response = %name, "oracle response is not a weekday");
                }
                resolved
            }
            Err(e) => {
                warn!(error = %e, "weekday oracle unreachable");
                None
            }
        }
    }
}

/// Parse one of the seven canonical English weekday names, case-insensitive.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Lowercase canonical name, the form stored in slot bindings and used in
/// derived output paths.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
