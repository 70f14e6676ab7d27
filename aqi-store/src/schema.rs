//! SQL schema for the SQLite byte store.

/// Returns the schema applied when a [`crate::backend::SqliteStore`] is opened.
///
/// - `cache_entries` - opaque cache payloads keyed by namespaced string
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS cache_entries (
        key TEXT PRIMARY KEY,
        value BLOB NOT NULL
    );
    "#
}
