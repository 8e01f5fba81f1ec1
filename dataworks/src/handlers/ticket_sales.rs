//! Total the Gold ticket sales from the SQLite database.
//!
//! Zero-slot operation: it works against fixed, implicitly known locations
//! under the data root.

use async_trait::async_trait;
use rusqlite::Connection;

use crate::errors::HandlerError;
use crate::extract::SlotBindings;
use crate::handlers::{write_output, HandlerContext};
use crate::registry::Handler;

pub const DB_FILE: &str = "ticket-sales.db";
pub const OUTPUT_FILE: &str = "ticket-sales-gold.txt";

pub struct TicketSalesHandler;

#[async_trait]
impl Handler for TicketSalesHandler {
    async fn run(
        &self,
        ctx: &HandlerContext,
        _params: &SlotBindings,
    ) -> Result<String, HandlerError> {
        let db_path = ctx.data_root.join(DB_FILE);
        let output = ctx.data_root.join(OUTPUT_FILE);

        if !db_path.exists() {
            return Err(HandlerError::MissingInput(db_path.display().to_string()));
        }

        let conn = Connection::open(&db_path)
            .map_err(|e| HandlerError::Malformed(format!("{}: {}", db_path.display(), e)))?;
        let total: f64 = conn
            .query_row(
                "SELECT COALESCE(SUM(units * price), 0) FROM tickets WHERE type = 'Gold'",
                [],
                |row| row.get(0),
            )
            .map_err(|e| HandlerError::Malformed(format!("{}: {}", db_path.display(), e)))?;

        write_output(&output, &total.to_string())?;
        Ok(format!(
            "total Gold ticket sales {} from {} -> {}",
            total,
            db_path.display(),
            output.display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::StubOracle;
    use std::sync::Arc;

    fn seed_db(path: &std::path::Path) {
        let conn = Connection::open(path).expect("open");
        conn.execute_batch(
            "CREATE TABLE tickets (type TEXT, units INTEGER, price REAL);
             INSERT INTO tickets VALUES ('Gold', 2, 10.0);
             INSERT INTO tickets VALUES ('Silver', 5, 4.0);
             INSERT INTO tickets VALUES ('Gold', 1, 7.5);",
        )
        .expect("seed");
    }

    #[tokio::test]
    async fn sums_only_gold_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        seed_db(&dir.path().join(DB_FILE));

        let ctx = HandlerContext::new(dir.path().to_path_buf(), Arc::new(StubOracle::new()));
        TicketSalesHandler
            .run(&ctx, &SlotBindings::new())
            .await
            .expect("handler");

        assert_eq!(
            std::fs::read_to_string(dir.path().join(OUTPUT_FILE)).expect("read"),
            "27.5"
        );
    }

    #[tokio::test]
    async fn empty_gold_set_totals_zero() {
        let dir = tempfile::tempdir().expect("temp dir");
        let conn = Connection::open(dir.path().join(DB_FILE)).expect("open");
        conn.execute_batch("CREATE TABLE tickets (type TEXT, units INTEGER, price REAL);")
            .expect("create");
        drop(conn);

        let ctx = HandlerContext::new(dir.path().to_path_buf(), Arc::new(StubOracle::new()));
        TicketSalesHandler
            .run(&ctx, &SlotBindings::new())
            .await
            .expect("handler");
        assert_eq!(
            std::fs::read_to_string(dir.path().join(OUTPUT_FILE)).expect("read"),
            "0"
        );
    }

    #[tokio::test]
    async fn missing_database_is_a_missing_input_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ctx = HandlerContext::new(dir.path().to_path_buf(), Arc::new(StubOracle::new()));
        let result = TicketSalesHandler.run(&ctx, &SlotBindings::new()).await;
        assert!(matches!(result, Err(HandlerError::MissingInput(_))));
    }
}
