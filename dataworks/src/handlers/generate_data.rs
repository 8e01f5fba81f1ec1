//! Regenerate the canonical data tree, seeded from an email address.

use async_trait::async_trait;

use crate::datagen;
use crate::errors::HandlerError;
use crate::extract::SlotBindings;
use crate::handlers::{require, HandlerContext};
use crate::registry::Handler;

pub struct GenerateDataHandler;

#[async_trait]
impl Handler for GenerateDataHandler {
    async fn run(
        &self,
        ctx: &HandlerContext,
        params: &SlotBindings,
    ) -> Result<String, HandlerError> {
        let email = require(params, "email")?;
        datagen::generate(&ctx.data_root, email)?;
        Ok(format!(
            "generated data tree under {} for {}",
            ctx.data_root.display(),
            email
        ))
    }
}
