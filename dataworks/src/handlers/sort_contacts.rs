//! Sort a JSON array of contact objects by (last_name, first_name).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::HandlerError;
use crate::extract::SlotBindings;
use crate::handlers::{read_to_string, require, write_output, HandlerContext};
use crate::registry::Handler;

pub struct SortContactsHandler;

#[async_trait]
impl Handler for SortContactsHandler {
    async fn run(
        &self,
        ctx: &HandlerContext,
        params: &SlotBindings,
    ) -> Result<String, HandlerError> {
        let input = ctx.resolve(require(params, "input")?);
        let output = ctx.resolve(require(params, "output")?);

        let content = read_to_string(&input)?;
        let parsed: Value = serde_json::from_str(&content)
            .map_err(|e| HandlerError::Malformed(format!("{}: {}", input.display(), e)))?;

        let mut contacts = match parsed {
            Value::Array(items) => items,
            _ => {
                return Err(HandlerError::Malformed(format!(
                    "{}: expected a JSON array of contacts",
                    input.display()
                )))
            }
        };

        contacts.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));

        let sorted = serde_json::to_string(&Value::Array(contacts))
            .map_err(|e| HandlerError::Malformed(e.to_string()))?;
        write_output(&output, &sorted)?;
        Ok(format!(
            "sorted contacts from {} -> {}",
            input.display(),
            output.display()
        ))
    }
}

fn sort_key(contact: &Value) -> (String, String) {
    let field = |name: &str| {
        contact
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    (field("last_name"), field("first_name"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::StubOracle;
    use std::path::PathBuf;
    use std::sync::Arc;

    async fn run_on(content: &str) -> (tempfile::TempDir, Result<String, HandlerError>) {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("contacts.json"), content).expect("write");
        let ctx = HandlerContext::new(PathBuf::from(dir.path()), Arc::new(StubOracle::new()));
        let params = SlotBindings::from([
            ("input".to_string(), "/data/contacts.json".to_string()),
            ("output".to_string(), "/data/contacts-sorted.json".to_string()),
        ]);
        let result = SortContactsHandler.run(&ctx, &params).await;
        (dir, result)
    }

    #[tokio::test]
    async fn sorts_by_last_name_then_first_name() {
        let (dir, result) = run_on(
            r#"[
                {"first_name":"Zoe","last_name":"Adams","email":"z@example.com"},
                {"first_name":"Amy","last_name":"Adams","email":"a@example.com"},
                {"first_name":"Bob","last_name":"Abbott","email":"b@example.com"}
            ]"#,
        )
        .await;
        result.expect("handler");

        let sorted: Vec<Value> = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("contacts-sorted.json")).expect("read"),
        )
        .expect("json");
        let names: Vec<(String, String)> = sorted
            .iter()
            .map(|c| {
                (
                    c["last_name"].as_str().unwrap().to_string(),
                    c["first_name"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            names,
            vec![
                ("Abbott".to_string(), "Bob".to_string()),
                ("Adams".to_string(), "Amy".to_string()),
                ("Adams".to_string(), "Zoe".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn non_array_json_is_malformed() {
        let (_dir, result) = run_on(r#"{"first_name":"Amy"}"#).await;
        assert!(matches!(result, Err(HandlerError::Malformed(_))));
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let (_dir, result) = run_on("not json at all").await;
        assert!(matches!(result, Err(HandlerError::Malformed(_))));
    }
}
