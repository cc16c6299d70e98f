/// Inline SQL migrations for the proman store.
///
/// Every bucket shares one table; a record is a JSON document addressed by
/// `(bucket, key)`.

pub const MIGRATIONS: &[&str] = &[
    // Migration 1: records table
    r#"
CREATE TABLE IF NOT EXISTS records (
    bucket TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (bucket, key)
) WITHOUT ROWID;
"#,
];
