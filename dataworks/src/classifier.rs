//! Classifier Gateway
//!
//! Wraps the classification oracle. The oracle's raw response is trimmed and
//! must match a known label code exactly; extra prose, unknown codes and
//! transport failures all degrade to `Undetermined` rather than a guess.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::labels::OperationLabel;
use crate::oracle::Oracle;

const CONFIRM_KEYWORDS: [&str; 3] = ["count", "find", "how many"];

pub struct ClassifierGateway {
    oracle: Arc<dyn Oracle>,
    catalogue: String,
}

impl ClassifierGateway {
    /// `catalogue` is the label listing shown to the oracle, one
    /// `code: description` line per operation.
    pub fn new(oracle: Arc<dyn Oracle>, catalogue: String) -> Self {
        Self { oracle, catalogue }
    }

    pub async fn classify(&self, task: &str) -> OperationLabel {
        match self.oracle.classify(task, &self.catalogue).await {
            Ok(raw) => {
                let trimmed = raw.trim();
                match OperationLabel::parse_code(trimmed) {
                    Some(label) => {
                        debug!(label = %label, "task classified");
                        label
                    }
                    None => {
                        warn!(response = trimmed, "oracle returned an unknown label");
                        OperationLabel::Undetermined
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "classification oracle unreachable");
                OperationLabel::Undetermined
            }
        }
    }

    /// Confirms that a task is really about weekday counting before a weekday
    /// is extracted. Precedence is explicit and total: the keyword heuristic
    /// runs first; only on a heuristic miss is the binary oracle consulted;
    /// any other oracle response or failure is `false`.
    pub async fn confirm_weekday_counting(&self, task: &str) -> bool {
        let lower = task.to_lowercase();
        if CONFIRM_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            return true;
        }

        let question = format!(
            "Is this task asking to count occurrences of a day of the week? Task: {}",
            task
        );
        match self.oracle.confirm(&question).await {
            Ok(raw) => raw.trim().to_lowercase().starts_with("yes"),
            Err(e) => {
                warn!(error = %e, "confirmation oracle unreachable");
                false
            }
        }
    }
}
