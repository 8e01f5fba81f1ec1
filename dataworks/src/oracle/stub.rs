//! Deterministic oracle for tests. Each judgment is scripted up front; a
//! method with nothing scripted fails the way an unreachable oracle would, so
//! tests can exercise degraded paths too.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::errors::OracleError;
use crate::oracle::Oracle;

#[derive(Default)]
pub struct StubOracle {
    classify_response: Option<String>,
    confirm_response: Option<String>,
    weekday_response: Option<String>,
    extract_response: Option<String>,
    image_response: Option<String>,
    embeddings: Option<Vec<Vec<f32>>>,
    calls: AtomicUsize,
}

impl StubOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classify(mut self, response: impl Into<String>) -> Self {
        self.classify_response = Some(response.into());
        self
    }

    pub fn with_confirm(mut self, response: impl Into<String>) -> Self {
        self.confirm_response = Some(response.into());
        self
    }

    pub fn with_weekday(mut self, response: impl Into<String>) -> Self {
        self.weekday_response = Some(response.into());
        self
    }

    pub fn with_extracted_text(mut self, response: impl Into<String>) -> Self {
        self.extract_response = Some(response.into());
        self
    }

    pub fn with_image_text(mut self, response: impl Into<String>) -> Self {
        self.image_response = Some(response.into());
        self
    }

    pub fn with_embeddings(mut self, embeddings: Vec<Vec<f32>>) -> Self {
        self.embeddings = Some(embeddings);
        self
    }

    /// Number of oracle calls made so far, across all methods.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn scripted(&self, response: &Option<String>, method: &str) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        response
            .clone()
            .ok_or_else(|| OracleError::Http(format!("stub: no {} response scripted", method)))
    }
}

#[async_trait]
impl Oracle for StubOracle {
    async fn classify(&self, _task: &str, _catalogue: &str) -> Result<String, OracleError> {
        self.scripted(&self.classify_response, "classify")
    }

    async fn confirm(&self, _question: &str) -> Result<String, OracleError> {
        self.scripted(&self.confirm_response, "confirm")
    }

    async fn translate_weekday(&self, _text: &str) -> Result<String, OracleError> {
        self.scripted(&self.weekday_response, "translate_weekday")
    }

    async fn extract_text(
        &self,
        _instruction: &str,
        _content: &str,
    ) -> Result<String, OracleError> {
        self.scripted(&self.extract_response, "extract_text")
    }

    async fn extract_text_from_image(
        &self,
        _instruction: &str,
        _png_bytes: &[u8],
    ) -> Result<String, OracleError> {
        self.scripted(&self.image_response, "extract_text_from_image")
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let embeddings = self
            .embeddings
            .clone()
            .ok_or_else(|| OracleError::Http("stub: no embeddings scripted".to_string()))?;
        if embeddings.len() != texts.len() {
            return Err(OracleError::Parse(format!(
                "stub: {} embeddings scripted for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }
        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unscripted_method_fails_like_an_unreachable_oracle() {
        let stub = StubOracle::new();
        let result = stub.classify("task", "catalogue").await;
        assert!(matches!(result, Err(OracleError::Http(_))));
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn scripted_responses_are_returned_verbatim() {
        let stub = StubOracle::new().with_classify("  A3 \n");
        assert_eq!(stub.classify("t", "c").await.unwrap(), "  A3 \n");
    }
}
