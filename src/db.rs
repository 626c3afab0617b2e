use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, params};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{Claim, DayTag};

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn default_db_path() -> PathBuf {
    let mut path = PathBuf::from("data");
    path.push("allowance_tracker.sqlite");
    path
}

/// Open the store at `path`, creating the file and any parent
/// directories as needed, and bring the schema up to date.
pub fn open(path: &Path) -> Result<DbPool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::new(manager)?;
    {
        let conn = pool.get()?;
        run_migrations(&conn)?;
    }
    debug!(path = %path.display(), "opened claims store");
    Ok(pool)
}

fn run_migrations(conn: &Connection) -> Result<()> {
    // No foreign key from claims into any category table: the catalog is
    // session state and the claim -> category reference is soft.
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS claims (
            id TEXT PRIMARY KEY,
            date_key TEXT NOT NULL,
            month_key TEXT NOT NULL,
            cat_key TEXT NOT NULL,
            qty INTEGER NOT NULL,
            amount_each_cents INTEGER NOT NULL,
            note TEXT,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_claims_by_date ON claims(date_key);
        CREATE INDEX IF NOT EXISTS idx_claims_by_month ON claims(month_key);

        CREATE TABLE IF NOT EXISTS day_tags (
            date_key TEXT PRIMARY KEY,
            tag TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

pub fn put_claim(conn: &Connection, claim: &Claim) -> Result<()> {
    conn.execute(
        "
        INSERT OR REPLACE INTO claims
            (id, date_key, month_key, cat_key, qty, amount_each_cents, note, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ",
        params![
            claim.id,
            claim.date_key,
            claim.month_key,
            claim.cat_key,
            claim.qty,
            claim.amount_each_cents,
            claim.note,
            claim.created_at
        ],
    )?;
    Ok(())
}

/// Deleting an id that is not there is a no-op.
pub fn delete_claim(conn: &Connection, id: &str) -> Result<()> {
    conn.execute("DELETE FROM claims WHERE id = ?1", params![id])?;
    Ok(())
}

fn row_to_claim(row: &rusqlite::Row<'_>) -> rusqlite::Result<Claim> {
    Ok(Claim {
        id: row.get(0)?,
        date_key: row.get(1)?,
        month_key: row.get(2)?,
        cat_key: row.get(3)?,
        qty: row.get(4)?,
        amount_each_cents: row.get(5)?,
        note: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn list_claims_by_month(conn: &Connection, month_key: &str) -> Result<Vec<Claim>> {
    let mut stmt = conn.prepare(
        "
        SELECT id, date_key, month_key, cat_key, qty, amount_each_cents, note, created_at
        FROM claims
        WHERE month_key = ?1
        ",
    )?;
    let rows = stmt.query_map(params![month_key], row_to_claim)?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn list_claims_by_date(conn: &Connection, date_key: &str) -> Result<Vec<Claim>> {
    let mut stmt = conn.prepare(
        "
        SELECT id, date_key, month_key, cat_key, qty, amount_each_cents, note, created_at
        FROM claims
        WHERE date_key = ?1
        ",
    )?;
    let rows = stmt.query_map(params![date_key], row_to_claim)?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn list_all_claims(conn: &Connection) -> Result<Vec<Claim>> {
    let mut stmt = conn.prepare(
        "
        SELECT id, date_key, month_key, cat_key, qty, amount_each_cents, note, created_at
        FROM claims
        ",
    )?;
    let rows = stmt.query_map([], row_to_claim)?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Upsert the tag for a date. Writing `""` keeps a row with an empty tag;
/// clearing never deletes the record.
pub fn set_day_tag(conn: &Connection, date_key: &str, tag: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO day_tags (date_key, tag) VALUES (?1, ?2)",
        params![date_key, tag],
    )?;
    Ok(())
}

/// The tag for a date, or `""` when there is none. An absent row and an
/// empty tag are indistinguishable to callers; both render as "no tag".
pub fn get_day_tag(conn: &Connection, date_key: &str) -> Result<String> {
    let mut stmt = conn.prepare("SELECT tag FROM day_tags WHERE date_key = ?1")?;
    let mut rows = stmt.query(params![date_key])?;
    if let Some(row) = rows.next()? {
        Ok(row.get(0)?)
    } else {
        Ok(String::new())
    }
}

/// Tags for every date of a month, keyed by date key. A range over the
/// primary key, so the cost scales with the days of the month rather
/// than the whole tag keyspace.
pub fn list_day_tags_for_month(
    conn: &Connection,
    month_key: &str,
) -> Result<BTreeMap<String, String>> {
    let lo = format!("{month_key}-01");
    let hi = format!("{month_key}-32");
    let mut stmt = conn.prepare(
        "
        SELECT date_key, tag
        FROM day_tags
        WHERE date_key BETWEEN ?1 AND ?2
        ",
    )?;
    let rows = stmt.query_map(params![lo, hi], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut out = BTreeMap::new();
    for row in rows {
        let (date_key, tag) = row?;
        out.insert(date_key, tag);
    }
    Ok(out)
}

pub fn list_all_day_tags(conn: &Connection) -> Result<Vec<DayTag>> {
    let mut stmt = conn.prepare("SELECT date_key, tag FROM day_tags")?;
    let rows = stmt.query_map([], |row| {
        Ok(DayTag {
            date_key: row.get(0)?,
            tag: row.get(1)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn get_meta(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM meta WHERE key = ?1")?;
    let mut rows = stmt.query(params![key])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row.get(0)?))
    } else {
        Ok(None)
    }
}

pub fn set_meta(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

/// Clear claims, day tags and settings. Each DELETE is independently
/// atomic; there is no cross-table transaction, but all three tables end
/// empty. Wiping an already empty store succeeds.
pub fn wipe_all(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        DELETE FROM claims;
        DELETE FROM day_tags;
        DELETE FROM meta;
        ",
    )?;
    info!("wiped all store contents");
    Ok(())
}
