//! Handler runs over the generator-backed data tree: the A1 generator
//! doubles as the fixture factory for every other operation.

use std::path::Path;
use std::sync::Arc;

use dataworks::dispatch::{Dispatcher, OutcomeStatus};
use dataworks::oracle::StubOracle;
use dataworks::registry::OperationRegistry;

const EMAIL: &str = "fixtures@example.com";

fn dispatcher(stub: StubOracle, root: &Path) -> Dispatcher {
    Dispatcher::new(
        Arc::new(OperationRegistry::standard()),
        Arc::new(stub),
        root.to_path_buf(),
    )
}

async fn generate(root: &Path) {
    let agent = dispatcher(StubOracle::new().with_classify("A1"), root);
    let outcome = agent
        .run(&format!("Generate the data files for {}", EMAIL))
        .await;
    assert_eq!(outcome.status, OutcomeStatus::Success, "{}", outcome.message);
}

#[tokio::test]
async fn generate_then_count_weekdays_over_the_full_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    generate(dir.path()).await;

    let stub = StubOracle::new().with_classify("A3").with_weekday("monday");
    let outcome = dispatcher(stub, dir.path())
        .run("Count the Mondays in /data/dates.txt and write to /data/mondays.txt")
        .await;
    assert_eq!(outcome.status, OutcomeStatus::Success, "{}", outcome.message);

    let count: u64 = std::fs::read_to_string(dir.path().join("mondays.txt"))
        .expect("read")
        .parse()
        .expect("decimal count");
    // 1000 mixed dates: a weekday bucket is never empty in practice.
    assert!(count > 0);
}

#[tokio::test]
async fn generate_then_sort_contacts() {
    let dir = tempfile::tempdir().expect("temp dir");
    generate(dir.path()).await;

    let outcome = dispatcher(StubOracle::new().with_classify("A4"), dir.path())
        .run("Sort /data/contacts.json into /data/contacts-sorted.json")
        .await;
    assert_eq!(outcome.status, OutcomeStatus::Success, "{}", outcome.message);

    let sorted: Vec<serde_json::Value> = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("contacts-sorted.json")).expect("read"),
    )
    .expect("json");
    let keys: Vec<(String, String)> = sorted
        .iter()
        .map(|c| {
            (
                c["last_name"].as_str().unwrap().to_string(),
                c["first_name"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    let mut expected = keys.clone();
    expected.sort();
    assert_eq!(keys, expected);
}

#[tokio::test]
async fn generate_then_take_recent_log_lines() {
    let dir = tempfile::tempdir().expect("temp dir");
    generate(dir.path()).await;

    let outcome = dispatcher(StubOracle::new().with_classify("A5"), dir.path())
        .run("Write the first line of the 10 most recent logs in /data/logs/ to /data/logs-recent.txt")
        .await;
    assert_eq!(outcome.status, OutcomeStatus::Success, "{}", outcome.message);

    let written = std::fs::read_to_string(dir.path().join("logs-recent.txt")).expect("read");
    assert_eq!(written.lines().count(), 10);
}

#[tokio::test]
async fn generate_then_index_markdown_titles() {
    let dir = tempfile::tempdir().expect("temp dir");
    generate(dir.path()).await;

    let outcome = dispatcher(StubOracle::new().with_classify("A6"), dir.path())
        .run("Index the markdown files in /data/docs/")
        .await;
    assert_eq!(outcome.status, OutcomeStatus::Success, "{}", outcome.message);

    let index: std::collections::BTreeMap<String, String> = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("docs/index.json")).expect("read"),
    )
    .expect("json");
    assert_eq!(index["readme.md"], "Project Overview");
    assert_eq!(index["guides/install.md"], "Installation Guide");
}

#[tokio::test]
async fn generate_then_total_gold_ticket_sales() {
    let dir = tempfile::tempdir().expect("temp dir");
    generate(dir.path()).await;

    let outcome = dispatcher(StubOracle::new().with_classify("A10"), dir.path())
        .run("Total the Gold ticket sales")
        .await;
    assert_eq!(outcome.status, OutcomeStatus::Success, "{}", outcome.message);

    let total: f64 = std::fs::read_to_string(dir.path().join("ticket-sales-gold.txt"))
        .expect("read")
        .parse()
        .expect("decimal total");
    assert!(total > 0.0);
}

#[tokio::test]
async fn regeneration_is_an_idempotent_overwrite() {
    let dir = tempfile::tempdir().expect("temp dir");
    generate(dir.path()).await;
    let first = std::fs::read_to_string(dir.path().join("dates.txt")).expect("read");
    generate(dir.path()).await;
    let second = std::fs::read_to_string(dir.path().join("dates.txt")).expect("read");
    assert_eq!(first, second);
}
