//! Index markdown files by their first H1 title.
//!
//! Walks the input directory recursively and maps each `.md` file (path
//! relative to that directory) to the text of its first `# ` heading.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::errors::HandlerError;
use crate::extract::SlotBindings;
use crate::handlers::{require, write_output, HandlerContext};
use crate::registry::Handler;

pub struct MarkdownIndexHandler;

#[async_trait]
impl Handler for MarkdownIndexHandler {
    async fn run(
        &self,
        ctx: &HandlerContext,
        params: &SlotBindings,
    ) -> Result<String, HandlerError> {
        let input = ctx.resolve(require(params, "input")?);
        let output = ctx.resolve(require(params, "output")?);

        if !input.is_dir() {
            return Err(HandlerError::MissingInput(input.display().to_string()));
        }

        let mut files = Vec::new();
        collect_markdown(&input, &mut files)?;

        // BTreeMap keeps the index stable across runs.
        let mut index = BTreeMap::new();
        for path in files {
            if let Some(title) = first_h1(&std::fs::read_to_string(&path)?) {
                let relative = path
                    .strip_prefix(&input)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/");
                index.insert(relative, title);
            }
        }

        let count = index.len();
        let json = serde_json::to_string(&index)
            .map_err(|e| HandlerError::Malformed(e.to_string()))?;
        write_output(&output, &json)?;
        Ok(format!(
            "indexed {} markdown titles from {} -> {}",
            count,
            input.display(),
            output.display()
        ))
    }
}

fn collect_markdown(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), HandlerError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_markdown(&path, files)?;
        } else if path.extension().map(|e| e == "md").unwrap_or(false) {
            files.push(path);
        }
    }
    Ok(())
}

fn first_h1(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::StubOracle;
    use std::sync::Arc;

    #[test]
    fn first_h1_skips_lower_level_headings() {
        assert_eq!(
            first_h1("## sub\ntext\n# Real Title\n# Second\n"),
            Some("Real Title".to_string())
        );
        assert_eq!(first_h1("no headings here\n"), None);
    }

    #[tokio::test]
    async fn index_maps_relative_paths_to_titles() {
        let dir = tempfile::tempdir().expect("temp dir");
        let docs = dir.path().join("docs");
        std::fs::create_dir_all(docs.join("guides")).expect("mkdir");
        std::fs::write(docs.join("readme.md"), "# Home\ntext\n").expect("write");
        std::fs::write(docs.join("guides/setup.md"), "intro\n# Setup Guide\n").expect("write");
        std::fs::write(docs.join("guides/empty.md"), "no title\n").expect("write");
        std::fs::write(docs.join("data.csv"), "a,b\n").expect("write");

        let ctx = HandlerContext::new(dir.path().to_path_buf(), Arc::new(StubOracle::new()));
        let params = SlotBindings::from([
            ("input".to_string(), "/data/docs/".to_string()),
            ("output".to_string(), "/data/docs/index.json".to_string()),
        ]);
        MarkdownIndexHandler
            .run(&ctx, &params)
            .await
            .expect("handler");

        let index: BTreeMap<String, String> = serde_json::from_str(
            &std::fs::read_to_string(docs.join("index.json")).expect("read"),
        )
        .expect("json");
        assert_eq!(index.len(), 2);
        assert_eq!(index["readme.md"], "Home");
        assert_eq!(index["guides/setup.md"], "Setup Guide");
    }

    #[tokio::test]
    async fn missing_directory_is_a_missing_input_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ctx = HandlerContext::new(dir.path().to_path_buf(), Arc::new(StubOracle::new()));
        let params = SlotBindings::from([
            ("input".to_string(), "/data/docs/".to_string()),
            ("output".to_string(), "/data/docs/index.json".to_string()),
        ]);
        let result = MarkdownIndexHandler.run(&ctx, &params).await;
        assert!(matches!(result, Err(HandlerError::MissingInput(_))));
    }
}
