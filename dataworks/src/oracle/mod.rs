//! Oracle Abstraction
//!
//! Every external judgment the agent needs (classification, yes/no
//! confirmation, weekday translation, text extraction, OCR, embeddings) goes
//! through this narrow interface, so any concrete oracle implementation is
//! swappable and mockable in tests.
//!
//! Implementations return the oracle's RAW response text; validation (exact
//! label match, closed weekday set, yes/no parse, digit check) belongs to the
//! layers above so it stays unit-testable without HTTP.

mod openai;
mod stub;

pub use openai::OpenAiOracle;
pub use stub::StubOracle;

use async_trait::async_trait;

use crate::errors::OracleError;

#[async_trait]
pub trait Oracle: Send + Sync {
    /// Ask the oracle to pick one label code from the catalogue for the task
    /// text. Returns the raw response; the classifier gateway enforces the
    /// exact-match rule.
    async fn classify(&self, task: &str, catalogue: &str) -> Result<String, OracleError>;

    /// Ask a yes/no question. Returns the raw response.
    async fn confirm(&self, question: &str) -> Result<String, OracleError>;

    /// Translate whatever day-of-week reference the text contains (in any
    /// language) into an English weekday name. Returns the raw response; the
    /// weekday resolver enforces the closed seven-name set.
    async fn translate_weekday(&self, text: &str) -> Result<String, OracleError>;

    /// Apply a free-form extraction instruction to a piece of text.
    async fn extract_text(&self, instruction: &str, content: &str)
        -> Result<String, OracleError>;

    /// Apply an extraction instruction to a PNG image (OCR-style).
    async fn extract_text_from_image(
        &self,
        instruction: &str,
        png_bytes: &[u8],
    ) -> Result<String, OracleError>;

    /// Embed each text into a vector. Vectors are returned in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, OracleError>;
}
