//! Operation Registry
//!
//! Immutable label → (slot specs, handler) table built once at startup and
//! injected into the dispatcher. Adding an operation is a registry entry, not
//! a new branch. The registry also provides the label catalogue for the
//! classifier prompt.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::HandlerError;
use crate::extract::{SlotBindings, SlotShape, SlotSpec};
use crate::handlers::{
    CreditCardNumberHandler, EmailSenderHandler, FormatFileHandler, GenerateDataHandler,
    HandlerContext, MarkdownIndexHandler, RecentLogLinesHandler, SimilarCommentsHandler,
    SortContactsHandler, TicketSalesHandler, WeekdayCountHandler,
};
use crate::labels::OperationLabel;

/// A transformation routine invoked with already-bound parameters. On success
/// the returned string is the user-visible message.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn run(
        &self,
        ctx: &HandlerContext,
        params: &SlotBindings,
    ) -> Result<String, HandlerError>;
}

pub struct OperationSpec {
    pub label: OperationLabel,
    pub slots: Vec<SlotSpec>,
    pub handler: Arc<dyn Handler>,
}

impl OperationSpec {
    pub fn needs_weekday(&self) -> bool {
        self.slots.iter().any(|s| s.shape == SlotShape::Weekday)
    }
}

pub struct OperationRegistry {
    table: HashMap<OperationLabel, OperationSpec>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    pub fn register(
        mut self,
        label: OperationLabel,
        slots: Vec<SlotSpec>,
        handler: Arc<dyn Handler>,
    ) -> Self {
        self.table.insert(
            label,
            OperationSpec {
                label,
                slots,
                handler,
            },
        );
        self
    }

    pub fn get(&self, label: OperationLabel) -> Option<&OperationSpec> {
        self.table.get(&label)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Label catalogue for the classification prompt, one line per registered
    /// operation, in stable label order.
    pub fn catalogue(&self) -> String {
        let mut lines = Vec::with_capacity(self.table.len());
        for label in OperationLabel::ALL {
            if self.table.contains_key(&label) {
                lines.push(format!("{}: {}", label.code(), label.description()));
            }
        }
        lines.join("\n")
    }

    /// The full ten-operation table.
    pub fn standard() -> Self {
        use OperationLabel::*;
        use SlotShape::*;

        OperationRegistry::new()
            .register(
                GenerateData,
                vec![SlotSpec::required("email", Email)],
                Arc::new(GenerateDataHandler),
            )
            .register(
                FormatFile,
                vec![
                    SlotSpec::with_default("input", AnyPath, "/data/format.md"),
                    SlotSpec::with_default("version", VersionMarker, "prettier@3.4.2"),
                ],
                Arc::new(FormatFileHandler),
            )
            .register(
                CountWeekdays,
                vec![
                    SlotSpec::required("weekday", Weekday),
                    SlotSpec::with_default("input", FileWithSuffix(".txt"), "/data/dates.txt"),
                    SlotSpec::with_default(
                        "output",
                        FileWithSuffix(".txt"),
                        "/data/dates-{weekday}s.txt",
                    ),
                ],
                Arc::new(WeekdayCountHandler),
            )
            .register(
                SortContacts,
                vec![
                    SlotSpec::with_default("input", FileWithSuffix(".json"), "/data/contacts.json"),
                    SlotSpec::with_default(
                        "output",
                        FileWithSuffix(".json"),
                        "/data/contacts-sorted.json",
                    ),
                ],
                Arc::new(SortContactsHandler),
            )
            .register(
                RecentLogLines,
                vec![
                    SlotSpec::with_default("input", Directory, "/data/logs/"),
                    SlotSpec::with_default("output", FileWithSuffix(".txt"), "/data/logs-recent.txt"),
                ],
                Arc::new(RecentLogLinesHandler),
            )
            .register(
                MarkdownIndex,
                vec![
                    SlotSpec::with_default("input", Directory, "/data/docs/"),
                    SlotSpec::with_default("output", FileWithSuffix(".json"), "/data/docs/index.json"),
                ],
                Arc::new(MarkdownIndexHandler),
            )
            .register(
                EmailSender,
                vec![
                    SlotSpec::with_default("input", FileWithSuffix(".txt"), "/data/email.txt"),
                    SlotSpec::with_default("output", FileWithSuffix(".txt"), "/data/email-sender.txt"),
                ],
                Arc::new(EmailSenderHandler),
            )
            .register(
                CreditCardNumber,
                vec![
                    SlotSpec::with_default("input", FileWithSuffix(".png"), "/data/credit_card.png"),
                    SlotSpec::with_default("output", FileWithSuffix(".txt"), "/data/credit-card.txt"),
                ],
                Arc::new(CreditCardNumberHandler),
            )
            .register(
                SimilarComments,
                vec![
                    SlotSpec::with_default("input", FileWithSuffix(".txt"), "/data/comments.txt"),
                    SlotSpec::with_default(
                        "output",
                        FileWithSuffix(".txt"),
                        "/data/comments-similar.txt",
                    ),
                ],
                Arc::new(SimilarCommentsHandler),
            )
            // Zero-slot operation: fixed, implicitly known data location.
            .register(TicketSales, vec![], Arc::new(TicketSalesHandler))
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
