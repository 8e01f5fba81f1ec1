//! Extract the sender's email address from a message via the oracle.

use async_trait::async_trait;

use crate::errors::HandlerError;
use crate::extract::SlotBindings;
use crate::handlers::{read_to_string, require, write_output, HandlerContext};
use crate::registry::Handler;

const INSTRUCTION: &str =
    "Extract the sender's email address from this email message. \
     Respond with only the address, nothing else.";

pub struct EmailSenderHandler;

#[async_trait]
impl Handler for EmailSenderHandler {
    async fn run(
        &self,
        ctx: &HandlerContext,
        params: &SlotBindings,
    ) -> Result<String, HandlerError> {
        let input = ctx.resolve(require(params, "input")?);
        let output = ctx.resolve(require(params, "output")?);

        let message = read_to_string(&input)?;
        let raw = ctx.oracle.extract_text(INSTRUCTION, &message).await?;
        let address = raw.trim();
        if address.is_empty() || !address.contains('@') {
            return Err(HandlerError::Malformed(format!(
                "oracle did not return an email address: '{}'",
                address
            )));
        }

        write_output(&output, address)?;
        Ok(format!(
            "extracted sender {} from {} -> {}",
            address,
            input.display(),
            output.display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::StubOracle;
    use std::sync::Arc;

    fn params() -> SlotBindings {
        SlotBindings::from([
            ("input".to_string(), "/data/email.txt".to_string()),
            ("output".to_string(), "/data/email-sender.txt".to_string()),
        ])
    }

    #[tokio::test]
    async fn writes_the_trimmed_address() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join("email.txt"),
            "From: Jane <jane@example.com>\nSubject: hi\n\nhello\n",
        )
        .expect("write");

        let oracle = Arc::new(StubOracle::new().with_extracted_text(" jane@example.com \n"));
        let ctx = HandlerContext::new(dir.path().to_path_buf(), oracle);
        EmailSenderHandler
            .run(&ctx, &params())
            .await
            .expect("handler");

        assert_eq!(
            std::fs::read_to_string(dir.path().join("email-sender.txt")).expect("read"),
            "jane@example.com"
        );
    }

    #[tokio::test]
    async fn non_address_oracle_response_is_malformed() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("email.txt"), "hello\n").expect("write");

        let oracle = Arc::new(StubOracle::new().with_extracted_text("I could not find one"));
        let ctx = HandlerContext::new(dir.path().to_path_buf(), oracle);
        let result = EmailSenderHandler.run(&ctx, &params()).await;
        assert!(matches!(result, Err(HandlerError::Malformed(_))));
    }

    #[tokio::test]
    async fn oracle_failure_is_a_handler_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("email.txt"), "hello\n").expect("write");

        let ctx = HandlerContext::new(dir.path().to_path_buf(), Arc::new(StubOracle::new()));
        let result = EmailSenderHandler.run(&ctx, &params()).await;
        assert!(matches!(result, Err(HandlerError::Oracle(_))));
    }
}
