//! Operation Labels
//!
//! The closed set of operation identifiers the classifier may produce.
//! `A1`..`A10` are wire codes shared with the classification oracle; anything
//! the oracle returns that is not an exact code maps to `Undetermined`.

use serde::{Deserialize, Serialize};

/// Discrete operation identifier produced by classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationLabel {
    GenerateData,
    FormatFile,
    CountWeekdays,
    SortContacts,
    RecentLogLines,
    MarkdownIndex,
    EmailSender,
    CreditCardNumber,
    SimilarComments,
    TicketSales,
    Undetermined,
}

impl OperationLabel {
    /// All classifiable labels, in catalogue order. `Undetermined` is not a
    /// catalogue entry; it is the absence of a classification.
    pub const ALL: [OperationLabel; 10] = [
        OperationLabel::GenerateData,
        OperationLabel::FormatFile,
        OperationLabel::CountWeekdays,
        OperationLabel::SortContacts,
        OperationLabel::RecentLogLines,
        OperationLabel::MarkdownIndex,
        OperationLabel::EmailSender,
        OperationLabel::CreditCardNumber,
        OperationLabel::SimilarComments,
        OperationLabel::TicketSales,
    ];

    /// The wire code sent to and expected back from the classification oracle.
    pub fn code(&self) -> &'static str {
        match self {
            OperationLabel::GenerateData => "A1",
            OperationLabel::FormatFile => "A2",
            OperationLabel::CountWeekdays => "A3",
            OperationLabel::SortContacts => "A4",
            OperationLabel::RecentLogLines => "A5",
            OperationLabel::MarkdownIndex => "A6",
            OperationLabel::EmailSender => "A7",
            OperationLabel::CreditCardNumber => "A8",
            OperationLabel::SimilarComments => "A9",
            OperationLabel::TicketSales => "A10",
            OperationLabel::Undetermined => "undetermined",
        }
    }

    /// One-line description used to build the classification catalogue prompt.
    pub fn description(&self) -> &'static str {
        match self {
            OperationLabel::GenerateData => {
                "generate or regenerate the source data files, seeded from an email address"
            }
            OperationLabel::FormatFile => "format a markdown file in place with a named formatter",
            OperationLabel::CountWeekdays => {
                "count how many dates in a file fall on a given day of the week"
            }
            OperationLabel::SortContacts => {
                "sort a JSON array of contacts by last name then first name"
            }
            OperationLabel::RecentLogLines => {
                "write the first line of the most recently modified log files"
            }
            OperationLabel::MarkdownIndex => {
                "index markdown files in a directory by their first H1 title"
            }
            OperationLabel::EmailSender => {
                "extract the sender's email address from an email message"
            }
            OperationLabel::CreditCardNumber => {
                "read a card number from an image and write its digits"
            }
            OperationLabel::SimilarComments => {
                "find the most similar pair of comments using embeddings"
            }
            OperationLabel::TicketSales => {
                "total the Gold ticket sales from the ticket database"
            }
            OperationLabel::Undetermined => "the task matches none of the known operations",
        }
    }

    /// Exact-match parse of an oracle response that has already been trimmed.
    /// Anything that is not a known code — extra prose, an unknown code, an
    /// empty string — is `None`; the caller decides what `Undetermined` means.
    pub fn parse_code(code: &str) -> Option<OperationLabel> {
        OperationLabel::ALL.iter().copied().find(|l| l.code() == code)
    }
}

impl std::fmt::Display for OperationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
