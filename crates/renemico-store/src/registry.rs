// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The registry database: connection setup, schema and error mapping.
//
// Member photos and QR images are stored inline as BLOBs; documents are
// never stored, they are rendered on demand from these records.

use rusqlite::{Connection, ErrorCode};
use tracing::{debug, info, instrument};

use renemico_core::error::{FieldError, RenemicoError};

const SCHEMA_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS members (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        code TEXT NOT NULL UNIQUE,
        province TEXT NOT NULL,
        category TEXT NOT NULL,
        function TEXT,
        site TEXT,
        nom TEXT NOT NULL,
        post_nom TEXT NOT NULL,
        prenom TEXT NOT NULL,
        sex TEXT NOT NULL,
        birth_date TEXT NOT NULL,
        birth_place TEXT NOT NULL,
        address TEXT,
        phone TEXT,
        email TEXT,
        photo BLOB,
        qrcode BLOB,
        registered_on TEXT NOT NULL,
        updated_on TEXT NOT NULL,
        expires_on TEXT NOT NULL,
        status TEXT NOT NULL,
        profession TEXT,
        observations TEXT,
        card_renewed INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS contributions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        member_id INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE,
        month TEXT NOT NULL,
        amount INTEGER NOT NULL,
        paid_at TEXT NOT NULL,
        UNIQUE (member_id, month)
    );

    CREATE TABLE IF NOT EXISTS operations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        motive TEXT NOT NULL,
        amount TEXT NOT NULL,
        collected_by TEXT NOT NULL,
        kind TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS duplicatas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        member_id INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        card_number TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL UNIQUE,
        level TEXT NOT NULL,
        photo BLOB,
        qrcode BLOB,
        is_verified INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_contributions_member ON contributions(member_id);
    CREATE INDEX IF NOT EXISTS idx_operations_date ON operations(date);
"#;

/// Registry of every RENEMICO record, backed by a SQLite database.
///
/// All methods are synchronous; documents are generated per request from
/// whatever the registry returns.
pub struct Registry {
    pub(crate) conn: Connection,
}

impl Registry {
    /// Open (or create) the registry database at the given path.
    ///
    /// Applies WAL journal mode, turns foreign keys on and creates any
    /// missing table.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> renemico_core::error::Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(db("open"))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(db("WAL pragma"))?;

        let registry = Self::prepare(conn)?;
        info!("registry database opened");
        Ok(registry)
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> renemico_core::error::Result<Self> {
        let conn = Connection::open_in_memory().map_err(db("open in-memory"))?;
        let registry = Self::prepare(conn)?;
        debug!("in-memory registry opened");
        Ok(registry)
    }

    fn prepare(conn: Connection) -> renemico_core::error::Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(db("foreign_keys pragma"))?;
        conn.execute_batch(SCHEMA_SQL).map_err(db("create schema"))?;
        Ok(Self { conn })
    }
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Field and French message for a violated constraint, keyed by the
/// `table.column` list SQLite reports.
const CONSTRAINTS: &[(&str, &str, &str)] = &[
    ("members.code", "code", "Ce code membre est déjà attribué."),
    (
        "contributions.member_id, contributions.month",
        "month",
        "Une cotisation existe déjà pour ce membre et ce mois.",
    ),
    (
        "duplicatas.card_number",
        "card_number",
        "Ce numéro de carte est déjà utilisé.",
    ),
    ("users.username", "username", "Ce nom d'utilisateur est déjà pris."),
    ("users.phone", "phone", "Ce numéro de téléphone est déjà utilisé."),
];

/// Map a SQLite error raised while doing `context` to a registry error.
/// Constraint violations become field validation errors.
pub(crate) fn db(context: &'static str) -> impl Fn(rusqlite::Error) -> RenemicoError {
    move |e| {
        if let rusqlite::Error::SqliteFailure(code, message) = &e {
            if code.code == ErrorCode::ConstraintViolation {
                let message = message.as_deref().unwrap_or_default();
                if let Some(field) = constraint_field(message) {
                    return RenemicoError::Validation(field);
                }
            }
        }
        RenemicoError::Database(format!("{context}: {e}"))
    }
}

fn constraint_field(message: &str) -> Option<FieldError> {
    if message.starts_with("FOREIGN KEY") {
        return Some(FieldError::new("member_id", "Membre introuvable."));
    }
    let columns = message.strip_prefix("UNIQUE constraint failed: ")?;
    CONSTRAINTS
        .iter()
        .find(|(key, _, _)| *key == columns)
        .map(|(_, field, reason)| FieldError::new(field, *reason))
}
