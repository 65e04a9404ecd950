//! Durable single-table persistence for items.
//!
//! One `items` table; `axes` is a JSON-encoded TEXT column and `status`
//! carries a CHECK constraint so only the two valid values ever reach disk.
//! Every operation is a single statement, so no explicit transactions are
//! needed — the connection serializes access behind a mutex.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::item::{Axis, Item, Status};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    axes TEXT NOT NULL,
    status TEXT NOT NULL CHECK(status IN ('planned', 'completed')),
    created_at TEXT NOT NULL,
    completed_at TEXT,
    updated_at TEXT NOT NULL
)";

/// Newest-first; id breaks ties for items created in the same millisecond.
const ORDER: &str = "ORDER BY created_at DESC, id DESC";

/// Handle to the items database. Cheap to clone; all clones share one
/// connection. Opened once at startup and injected into the service layer.
#[derive(Clone)]
pub struct ItemStore {
    conn: Arc<Mutex<Connection>>,
}

impl ItemStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("items db mutex poisoned")
    }

    /// Insert a new row and return its assigned id.
    pub fn insert(
        &self,
        text: &str,
        axes_json: &str,
        status: Status,
        created_at: &str,
        completed_at: Option<&str>,
        updated_at: &str,
    ) -> Result<i64> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO items (text, axes, status, created_at, completed_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![text, axes_json, status.as_str(), created_at, completed_at, updated_at],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All rows, newest `created_at` first.
    pub fn get_all(&self) -> Result<Vec<Item>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!("SELECT * FROM items {ORDER}"))?;
        let rows = stmt.query_map([], row_to_item)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Rows with the given status, newest first.
    pub fn get_by_status(&self, status: Status) -> Result<Vec<Item>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!("SELECT * FROM items WHERE status = ?1 {ORDER}"))?;
        let rows = stmt.query_map([status.as_str()], row_to_item)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Item>> {
        let conn = self.lock();
        let item = conn
            .query_row("SELECT * FROM items WHERE id = ?1", [id], row_to_item)
            .optional()?;
        Ok(item)
    }

    /// Partial update: NULL arguments keep the prior value for text/axes/status,
    /// while `completed_at` and `updated_at` are always written. Returns the
    /// number of rows affected. A missing id affects zero rows; callers that
    /// need NotFound must check existence first.
    pub fn update(
        &self,
        id: i64,
        text: Option<&str>,
        axes_json: Option<&str>,
        status: Option<Status>,
        completed_at: Option<&str>,
        updated_at: &str,
    ) -> Result<usize> {
        let conn = self.lock();
        let affected = conn.execute(
            "UPDATE items
             SET text = COALESCE(?1, text),
                 axes = COALESCE(?2, axes),
                 status = COALESCE(?3, status),
                 completed_at = ?4,
                 updated_at = ?5
             WHERE id = ?6",
            params![
                text,
                axes_json,
                status.map(Status::as_str),
                completed_at,
                updated_at,
                id
            ],
        )?;
        Ok(affected)
    }

    /// Remove the row. No-op (returns 0) when absent; deletion is permanent.
    pub fn delete(&self, id: i64) -> Result<usize> {
        let conn = self.lock();
        Ok(conn.execute("DELETE FROM items WHERE id = ?1", [id])?)
    }
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
    let axes_json: String = row.get("axes")?;
    let axes: Vec<Axis> = serde_json::from_str(&axes_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let status_str: String = row.get("status")?;
    let status: Status = status_str.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Item {
        id: row.get("id")?,
        text: row.get("text")?,
        axes,
        status,
        created_at: row.get("created_at")?,
        completed_at: row.get("completed_at")?,
        updated_at: row.get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn insert_at(store: &ItemStore, text: &str, status: Status, ts: &str) -> i64 {
        let completed = (status == Status::Completed).then_some(ts);
        store
            .insert(text, r#"["existence"]"#, status, ts, completed, ts)
            .unwrap()
    }

    #[test]
    fn open_creates_schema_on_disk() {
        let dir = TempDir::new().unwrap();
        let store = ItemStore::open(&dir.path().join("items.db")).unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let store = ItemStore::open_in_memory().unwrap();
        let a = insert_at(&store, "one", Status::Planned, "2026-01-01T00:00:00.000Z");
        let b = insert_at(&store, "two", Status::Planned, "2026-01-01T00:00:01.000Z");
        assert!(b > a);
    }

    #[test]
    fn get_all_orders_newest_first() {
        let store = ItemStore::open_in_memory().unwrap();
        insert_at(&store, "oldest", Status::Planned, "2026-01-01T00:00:00.000Z");
        insert_at(&store, "newest", Status::Planned, "2026-01-03T00:00:00.000Z");
        insert_at(&store, "middle", Status::Planned, "2026-01-02T00:00:00.000Z");

        let items = store.get_all().unwrap();
        let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, ["newest", "middle", "oldest"]);
    }

    #[test]
    fn get_by_status_filters() {
        let store = ItemStore::open_in_memory().unwrap();
        insert_at(&store, "plan", Status::Planned, "2026-01-01T00:00:00.000Z");
        insert_at(&store, "done", Status::Completed, "2026-01-02T00:00:00.000Z");

        let planned = store.get_by_status(Status::Planned).unwrap();
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].text, "plan");

        let completed = store.get_by_status(Status::Completed).unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].completed_at.as_deref(), Some("2026-01-02T00:00:00.000Z"));
    }

    #[test]
    fn get_by_id_returns_none_when_absent() {
        let store = ItemStore::open_in_memory().unwrap();
        assert!(store.get_by_id(999).unwrap().is_none());
    }

    #[test]
    fn update_coalesces_absent_fields() {
        let store = ItemStore::open_in_memory().unwrap();
        let id = insert_at(&store, "before", Status::Planned, "2026-01-01T00:00:00.000Z");

        let affected = store
            .update(id, Some("after"), None, None, None, "2026-01-01T00:01:00.000Z")
            .unwrap();
        assert_eq!(affected, 1);

        let item = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(item.text, "after");
        assert_eq!(item.status, Status::Planned);
        assert_eq!(item.axes, vec![Axis::Existence]);
        assert_eq!(item.updated_at, "2026-01-01T00:01:00.000Z");
        // created_at untouched
        assert_eq!(item.created_at, "2026-01-01T00:00:00.000Z");
    }

    #[test]
    fn update_missing_id_affects_zero_rows() {
        let store = ItemStore::open_in_memory().unwrap();
        let affected = store
            .update(42, Some("x"), None, None, None, "2026-01-01T00:00:00.000Z")
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[test]
    fn delete_is_permanent_and_idempotent() {
        let store = ItemStore::open_in_memory().unwrap();
        let id = insert_at(&store, "gone", Status::Planned, "2026-01-01T00:00:00.000Z");

        assert_eq!(store.delete(id).unwrap(), 1);
        assert!(store.get_by_id(id).unwrap().is_none());
        // second delete is a no-op at the store level
        assert_eq!(store.delete(id).unwrap(), 0);
    }

    #[test]
    fn axes_round_trip_preserves_order() {
        let store = ItemStore::open_in_memory().unwrap();
        let ts = "2026-01-01T00:00:00.000Z";
        let id = store
            .insert("doc", r#"["existence","purpose"]"#, Status::Planned, ts, None, ts)
            .unwrap();

        let item = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(item.axes, vec![Axis::Existence, Axis::Purpose]);
    }

    #[test]
    fn status_check_constraint_rejects_raw_garbage() {
        let store = ItemStore::open_in_memory().unwrap();
        let conn = store.conn.lock().unwrap();
        let result = conn.execute(
            "INSERT INTO items (text, axes, status, created_at, updated_at)
             VALUES ('x', '[]', 'bogus', 't', 't')",
            [],
        );
        assert!(result.is_err(), "CHECK constraint should reject bogus status");
    }
}
