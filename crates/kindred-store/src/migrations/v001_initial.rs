//! v001 -- Initial schema creation.
//!
//! Creates the single namespaced key/value table.  Records are JSON; the
//! namespace keeps chat threads, conversation summaries, and cached remote
//! state from colliding.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    ns   TEXT NOT NULL,      -- namespace: 'chat' | 'cache'
    key  TEXT NOT NULL,      -- e.g. peer username, 'matches', 'interests'
    json TEXT NOT NULL,      -- serialized record

    PRIMARY KEY (ns, key)
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
