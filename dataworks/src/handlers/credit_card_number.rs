//! Read a card number from an image via the OCR oracle.
//!
//! The oracle response is accepted only if, after stripping spaces, it is a
//! 12-19 digit sequence; anything else is an error naming the invalid result.

use async_trait::async_trait;

use crate::errors::HandlerError;
use crate::extract::SlotBindings;
use crate::handlers::{read_bytes, require, write_output, HandlerContext};
use crate::registry::Handler;

const INSTRUCTION: &str =
    "Read the long number printed on this card image. Respond with only the digits.";

pub struct CreditCardNumberHandler;

#[async_trait]
impl Handler for CreditCardNumberHandler {
    async fn run(
        &self,
        ctx: &HandlerContext,
        params: &SlotBindings,
    ) -> Result<String, HandlerError> {
        let input = ctx.resolve(require(params, "input")?);
        let output = ctx.resolve(require(params, "output")?);

        let image = read_bytes(&input)?;
        let raw = ctx.oracle.extract_text_from_image(INSTRUCTION, &image).await?;
        let digits = validate_card_number(&raw)?;

        write_output(&output, &digits)?;
        Ok(format!(
            "read {}-digit card number from {} -> {}",
            digits.len(),
            input.display(),
            output.display()
        ))
    }
}

/// Strip spaces and require 12-19 ASCII digits.
pub fn validate_card_number(raw: &str) -> Result<String, HandlerError> {
    let digits: String = raw.trim().chars().filter(|c| *c != ' ').collect();
    let valid = (12..=19).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());
    if valid {
        Ok(digits)
    } else {
        Err(HandlerError::Malformed(format!(
            "invalid OCR result, expected 12-19 digits: '{}'",
            raw.trim()
        )))
    }
}
