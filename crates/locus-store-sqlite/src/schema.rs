//! SQL schema for the Locus SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Owned by the authentication system; read-only for the batch jobs.
CREATE TABLE IF NOT EXISTS users (
    user_id        INTEGER PRIMARY KEY AUTOINCREMENT,
    login_name     TEXT    NOT NULL,
    validity_from  TEXT    NOT NULL,   -- RFC 3339 UTC
    validity_to    TEXT                -- NULL while active
);

-- History rows (validity_to set) point at their location through legacy_id.
CREATE TABLE IF NOT EXISTS locations (
    location_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    type           TEXT    NOT NULL CHECK (type IN ('R', 'D', 'W', 'V')),
    code           TEXT    NOT NULL,
    name           TEXT    NOT NULL,
    parent_id      INTEGER REFERENCES locations(location_id),
    validity_from  TEXT    NOT NULL,
    validity_to    TEXT,
    legacy_id      INTEGER REFERENCES locations(location_id),
    audit_user_id  INTEGER NOT NULL    -- -1 = system
);

-- At most one active row per (type, code, parent).
CREATE UNIQUE INDEX IF NOT EXISTS locations_active_key
    ON locations(type, code, IFNULL(parent_id, 0))
    WHERE validity_to IS NULL;

CREATE INDEX IF NOT EXISTS locations_code_idx ON locations(code);

-- Grants are append-only.
CREATE TABLE IF NOT EXISTS user_districts (
    user_district_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id          INTEGER NOT NULL REFERENCES users(user_id),
    location_id      INTEGER NOT NULL REFERENCES locations(location_id),
    validity_from    TEXT    NOT NULL,
    validity_to      TEXT,
    audit_user_id    INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS user_districts_user_idx ON user_districts(user_id);

PRAGMA user_version = 1;
";
