//! Deterministic data generator.
//!
//! (Re)generates the canonical source files under the data root, seeded from
//! an email address, so reruns are idempotent overwrites. The same generator
//! backs the `generate-data` operation and the integration-test fixtures.

use std::io::Write as _;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use filetime::FileTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusqlite::Connection;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::errors::HandlerError;
use crate::handlers::weekday_count::{DATETIME_FORMAT, DATE_FORMATS};

pub const DATES_LINES: usize = 1000;
pub const CONTACT_COUNT: usize = 100;
pub const LOG_FILE_COUNT: usize = 12;
pub const COMMENT_COUNT: usize = 10;
pub const TICKET_ROWS: usize = 100;

const FIRST_NAMES: [&str; 12] = [
    "Alice", "Bob", "Carol", "David", "Emma", "Frank", "Grace", "Henry", "Iris", "Jack", "Karen",
    "Liam",
];
const LAST_NAMES: [&str; 12] = [
    "Anderson", "Brown", "Clark", "Davis", "Evans", "Foster", "Garcia", "Harris", "Ibrahim",
    "Jones", "Kim", "Lopez",
];
const COMMENT_POOL: [&str; 14] = [
    "The delivery was faster than promised.",
    "The delivery arrived faster than promised.",
    "Support never answered my ticket.",
    "Packaging was damaged but the product works.",
    "Great value for the price.",
    "Excellent value for the price.",
    "The manual is impossible to follow.",
    "Setup took less than five minutes.",
    "I would order from this shop again.",
    "The color differs from the photos.",
    "Battery life is shorter than advertised.",
    "Customer service resolved my issue quickly.",
    "The size runs smaller than expected.",
    "Works exactly as described.",
];
const DOC_TITLES: [(&str, &str); 5] = [
    ("readme.md", "Project Overview"),
    ("guides/install.md", "Installation Guide"),
    ("guides/usage.md", "Usage Guide"),
    ("notes/roadmap.md", "Roadmap"),
    ("notes/changelog.md", "Changelog"),
];
const TICKET_TYPES: [&str; 3] = ["Gold", "Silver", "Bronze"];

/// 1x1 transparent PNG, enough for the OCR oracle contract.
const PLACEHOLDER_PNG: [u8; 67] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Seed = first 8 bytes of SHA-256 of the email, big-endian.
pub fn seed_from_email(email: &str) -> u64 {
    let digest = Sha256::digest(email.as_bytes());
    u64::from_be_bytes(digest[..8].try_into().expect("digest is 32 bytes"))
}

/// Generate the full data tree under `root`.
pub fn generate(root: &Path, email: &str) -> Result<(), HandlerError> {
    let mut rng = StdRng::seed_from_u64(seed_from_email(email));
    std::fs::create_dir_all(root)?;

    write_dates(root, &mut rng)?;
    write_contacts(root, &mut rng)?;
    write_logs(root, &mut rng)?;
    write_docs(root)?;
    write_email(root, &mut rng, email)?;
    write_comments(root, &mut rng)?;
    write_tickets(root, &mut rng)?;
    write_format_sample(root)?;
    std::fs::write(root.join("credit_card.png"), PLACEHOLDER_PNG)?;

    info!(root = %root.display(), email, "data tree generated");
    Ok(())
}

fn write_dates(root: &Path, rng: &mut StdRng) -> Result<(), HandlerError> {
    let base = NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date");
    let mut out = String::new();
    for _ in 0..DATES_LINES {
        let date = base + Duration::days(rng.gen_range(0..9000));
        let line = match rng.gen_range(0..4) {
            0 => date.format(DATE_FORMATS[0]).to_string(),
            1 => date.format(DATE_FORMATS[1]).to_string(),
            2 => date.format(DATE_FORMATS[2]).to_string(),
            _ => {
                let time = date
                    .and_hms_opt(rng.gen_range(0..24), rng.gen_range(0..60), rng.gen_range(0..60))
                    .expect("valid time");
                time.format(DATETIME_FORMAT).to_string()
            }
        };
        out.push_str(&line);
        out.push('\n');
    }
    std::fs::write(root.join("dates.txt"), out)?;
    Ok(())
}

fn write_contacts(root: &Path, rng: &mut StdRng) -> Result<(), HandlerError> {
    let mut contacts = Vec::with_capacity(CONTACT_COUNT);
    for _ in 0..CONTACT_COUNT {
        let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
        contacts.push(json!({
            "first_name": first,
            "last_name": last,
            "email": format!(
                "{}.{}{}@example.com",
                first.to_lowercase(),
                last.to_lowercase(),
                rng.gen_range(1..100)
            ),
        }));
    }
    std::fs::write(
        root.join("contacts.json"),
        serde_json::to_string(&contacts).map_err(|e| HandlerError::Malformed(e.to_string()))?,
    )?;
    Ok(())
}

fn write_logs(root: &Path, rng: &mut StdRng) -> Result<(), HandlerError> {
    let logs = root.join("logs");
    std::fs::create_dir_all(&logs)?;
    // Fixed base instant plus a per-file offset keeps the recency order
    // deterministic for a given seed.
    let base_time = 1_700_000_000i64;
    for i in 0..LOG_FILE_COUNT {
        let path = logs.join(format!("app-{:02}.log", i));
        let mut file = std::fs::File::create(&path)?;
        for line in 0..rng.gen_range(3..8) {
            writeln!(
                file,
                "{} [{}] request {} handled in {}ms",
                base_time + i as i64,
                if line % 3 == 0 { "WARN" } else { "INFO" },
                rng.gen_range(1000..9999),
                rng.gen_range(1..250)
            )?;
        }
        drop(file);
        filetime::set_file_mtime(
            &path,
            FileTime::from_unix_time(base_time + rng.gen_range(0..86_400), 0),
        )?;
    }
    Ok(())
}

fn write_docs(root: &Path) -> Result<(), HandlerError> {
    for (relative, title) in DOC_TITLES {
        let path = root.join("docs").join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(
            &path,
            format!("# {}\n\nGenerated documentation page.\n\n## Details\n\nNothing here yet.\n", title),
        )?;
    }
    Ok(())
}

fn write_email(root: &Path, rng: &mut StdRng, owner: &str) -> Result<(), HandlerError> {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    let sender = format!("{}.{}@example.org", first.to_lowercase(), last.to_lowercase());
    std::fs::write(
        root.join("email.txt"),
        format!(
            "From: {} {} <{}>\nTo: {}\nSubject: Quarterly report\n\nPlease find the report attached.\n",
            first, last, sender, owner
        ),
    )?;
    Ok(())
}

fn write_comments(root: &Path, rng: &mut StdRng) -> Result<(), HandlerError> {
    let mut picked = Vec::with_capacity(COMMENT_COUNT);
    while picked.len() < COMMENT_COUNT {
        let comment = COMMENT_POOL[rng.gen_range(0..COMMENT_POOL.len())];
        if !picked.contains(&comment) {
            picked.push(comment);
        }
    }
    std::fs::write(root.join("comments.txt"), format!("{}\n", picked.join("\n")))?;
    Ok(())
}

fn write_tickets(root: &Path, rng: &mut StdRng) -> Result<(), HandlerError> {
    let path = root.join("ticket-sales.db");
    if path.exists() {
        std::fs::remove_file(&path)?;
    }
    let conn = Connection::open(&path)
        .map_err(|e| HandlerError::Malformed(format!("{}: {}", path.display(), e)))?;
    conn.execute_batch("CREATE TABLE tickets (type TEXT, units INTEGER, price REAL)")
        .map_err(|e| HandlerError::Malformed(e.to_string()))?;
    let mut insert = conn
        .prepare("INSERT INTO tickets (type, units, price) VALUES (?1, ?2, ?3)")
        .map_err(|e| HandlerError::Malformed(e.to_string()))?;
    for _ in 0..TICKET_ROWS {
        insert
            .execute(rusqlite::params![
                TICKET_TYPES[rng.gen_range(0..TICKET_TYPES.len())],
                rng.gen_range(1..10i64),
                (rng.gen_range(500..5000) as f64) / 100.0,
            ])
            .map_err(|e| HandlerError::Malformed(e.to_string()))?;
    }
    Ok(())
}

fn write_format_sample(root: &Path) -> Result<(), HandlerError> {
    std::fs::write(
        root.join("format.md"),
        "# Sample Document   \n\n\n\nSome text with trailing spaces.   \nAnother line.\t\n\n\n## Section\nmore text\n\n\n",
    )?;
    Ok(())
}
