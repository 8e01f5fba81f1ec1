//! Dispatcher
//!
//! Per-request state machine: received -> classified -> extracted ->
//! executed -> completed. Success and error are both normal termination;
//! every code path ends in exactly one `OperationOutcome` and no fault
//! escapes to the HTTP boundary.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::classifier::ClassifierGateway;
use crate::errors::AgentError;
use crate::extract::{extract, SlotShape};
use crate::handlers::HandlerContext;
use crate::labels::OperationLabel;
use crate::oracle::Oracle;
use crate::registry::OperationRegistry;
use crate::weekday::{weekday_name, WeekdayResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Error,
}

/// Machine-readable failure kind, one per `AgentError` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Classification,
    Extraction,
    Handler,
}

/// The sole outward contract of the dispatcher and of every handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub message: String,
}

impl OperationOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Success,
            error_kind: None,
            message: message.into(),
        }
    }

    pub fn failure(error: AgentError) -> Self {
        let kind = match &error {
            AgentError::InvalidInput(_) => ErrorKind::InvalidInput,
            AgentError::Classification(_) => ErrorKind::Classification,
            AgentError::Extraction { .. } => ErrorKind::Extraction,
            AgentError::Handler(_) => ErrorKind::Handler,
        };
        Self {
            status: OutcomeStatus::Error,
            error_kind: Some(kind),
            message: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

pub struct Dispatcher {
    registry: Arc<OperationRegistry>,
    classifier: ClassifierGateway,
    resolver: WeekdayResolver,
    ctx: HandlerContext,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<OperationRegistry>,
        oracle: Arc<dyn Oracle>,
        data_root: PathBuf,
    ) -> Self {
        let classifier = ClassifierGateway::new(oracle.clone(), registry.catalogue());
        let resolver = WeekdayResolver::new(oracle.clone());
        let ctx = HandlerContext::new(data_root, oracle);
        Self {
            registry,
            classifier,
            resolver,
            ctx,
        }
    }

    /// Run one task from raw text to outcome.
    pub async fn run(&self, task: &str) -> OperationOutcome {
        let request_id = Uuid::new_v4();
        let outcome = self.run_inner(task).await;
        info!(
            %request_id,
            status = ?outcome.status,
            error_kind = ?outcome.error_kind,
            "task completed"
        );
        outcome
    }

    async fn run_inner(&self, task: &str) -> OperationOutcome {
        // received -> classified: reject empty text before any oracle call.
        let task = task.trim();
        if task.is_empty() {
            return OperationOutcome::failure(AgentError::InvalidInput(
                "task text is empty".to_string(),
            ));
        }

        let label = self.classifier.classify(task).await;
        if label == OperationLabel::Undetermined {
            return OperationOutcome::failure(AgentError::Classification(
                "the task matches none of the known operations".to_string(),
            ));
        }

        // classified -> extracted
        let spec = match self.registry.get(label) {
            Some(spec) => spec,
            None => {
                return OperationOutcome::failure(AgentError::Classification(format!(
                    "no handler registered for label {}",
                    label
                )))
            }
        };

        let mut extraction = extract(task, &spec.slots);

        if spec.needs_weekday() {
            // Both detection paths must agree before a weekday is extracted.
            if !self.classifier.confirm_weekday_counting(task).await {
                return OperationOutcome::failure(AgentError::Classification(
                    "the task was not confirmed as weekday counting".to_string(),
                ));
            }
            let day = match self.resolver.resolve(task).await {
                Some(day) => day,
                None => {
                    return OperationOutcome::failure(AgentError::Extraction {
                        missing: vec!["weekday (weekday)".to_string()],
                    })
                }
            };
            let name = weekday_name(day);
            for slot in &spec.slots {
                if slot.shape == SlotShape::Weekday {
                    extraction
                        .bindings
                        .insert(slot.name.to_string(), name.to_string());
                }
            }
            // Derived defaults like /data/dates-{weekday}s.txt take the
            // resolved day.
            for value in extraction.bindings.values_mut() {
                if value.contains("{weekday}") {
                    *value = value.replace("{weekday}", name);
                }
            }
        }

        if extraction.is_partial() {
            return OperationOutcome::failure(AgentError::Extraction {
                missing: extraction.missing,
            });
        }
        debug!(label = %label, bindings = ?extraction.bindings, "parameters bound");

        // extracted -> executed: a panicking handler is captured as a
        // handler error, never propagated.
        let handler = Arc::clone(&spec.handler);
        let ctx = self.ctx.clone();
        let params = extraction.bindings;
        let joined = tokio::spawn(async move { handler.run(&ctx, &params).await }).await;

        // executed -> completed
        match joined {
            Ok(Ok(message)) => OperationOutcome::success(message),
            Ok(Err(e)) => OperationOutcome::failure(AgentError::Handler(e.to_string())),
            Err(e) => OperationOutcome::failure(AgentError::Handler(format!(
                "handler aborted unexpectedly: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::StubOracle;

    fn dispatcher(stub: StubOracle, root: &std::path::Path) -> (Dispatcher, Arc<StubOracle>) {
        let oracle = Arc::new(stub);
        let dispatcher = Dispatcher::new(
            Arc::new(OperationRegistry::standard()),
            oracle.clone(),
            root.to_path_buf(),
        );
        (dispatcher, oracle)
    }

    #[tokio::test]
    async fn empty_task_short_circuits_before_any_oracle_call() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (dispatcher, oracle) = dispatcher(StubOracle::new(), dir.path());

        for task in ["", "   ", "\n\t "] {
            let outcome = dispatcher.run(task).await;
            assert_eq!(outcome.status, OutcomeStatus::Error);
            assert_eq!(outcome.error_kind, Some(ErrorKind::InvalidInput));
        }
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn undetermined_label_invokes_no_handler() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (dispatcher, _) =
            dispatcher(StubOracle::new().with_classify("no idea, sorry"), dir.path());

        let outcome = dispatcher.run("do something with /data/contacts.json").await;
        assert_eq!(outcome.error_kind, Some(ErrorKind::Classification));
        // The sort handler would have failed on the missing file with a
        // handler error; a classification error proves it never ran.
    }

    #[tokio::test]
    async fn partial_extraction_surfaces_missing_slots() {
        let dir = tempfile::tempdir().expect("temp dir");
        // A1 requires an email and declares no default for it.
        let (dispatcher, _) = dispatcher(StubOracle::new().with_classify("A1"), dir.path());

        let outcome = dispatcher.run("regenerate all the data files").await;
        assert_eq!(outcome.error_kind, Some(ErrorKind::Extraction));
        assert!(outcome.message.contains("email"));
    }

    #[tokio::test]
    async fn unresolved_weekday_is_an_extraction_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let stub = StubOracle::new()
            .with_classify("A3")
            .with_weekday("that would be the third day");
        let (dispatcher, _) = dispatcher(stub, dir.path());

        let outcome = dispatcher
            .run("Count the mercredis in /data/dates.txt and write to /data/out.txt")
            .await;
        assert_eq!(outcome.error_kind, Some(ErrorKind::Extraction));
        assert!(outcome.message.contains("weekday"));
    }

    #[tokio::test]
    async fn unconfirmed_weekday_counting_is_a_classification_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        // No counting keyword in the text and the oracle says no.
        let stub = StubOracle::new().with_classify("A3").with_confirm("no");
        let (dispatcher, _) = dispatcher(stub, dir.path());

        let outcome = dispatcher.run("do the wednesday thing with /data/dates.txt").await;
        assert_eq!(outcome.error_kind, Some(ErrorKind::Classification));
    }

    #[tokio::test]
    async fn handler_failure_is_a_handler_outcome_not_a_fault() {
        let dir = tempfile::tempdir().expect("temp dir");
        // A4 classified, but contacts.json does not exist.
        let (dispatcher, _) = dispatcher(StubOracle::new().with_classify("A4"), dir.path());

        let outcome = dispatcher
            .run("Sort /data/contacts.json into /data/contacts-sorted.json")
            .await;
        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert_eq!(outcome.error_kind, Some(ErrorKind::Handler));
        assert!(outcome.message.contains("contacts.json"));
    }

    #[tokio::test]
    async fn outcome_envelope_serializes_flat() {
        let outcome = OperationOutcome::failure(AgentError::InvalidInput("x".to_string()));
        let json = serde_json::to_value(&outcome).expect("serialize");
        assert_eq!(json["status"], "error");
        assert_eq!(json["error_kind"], "invalid_input");

        let ok = serde_json::to_value(OperationOutcome::success("done")).expect("serialize");
        assert_eq!(ok["status"], "success");
        assert!(ok.get("error_kind").is_none());
    }
}
