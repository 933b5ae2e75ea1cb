use super::gate::{WriteGate, DEFAULT_WRITE_WAIT};
use super::{page_limit, DocumentStore, RecentOrder};
use crate::error::{Result, SwdocsError};
use crate::model::{Document, DocumentPayload, DocumentSummary, Sections};
use crate::pattern::SearchPattern;
use crate::timestamp::{StampClock, Timestamp};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS swdocs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    user        TEXT,
    created     TEXT NOT NULL,
    updated     TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    sections    TEXT NOT NULL DEFAULT '[]'
);
CREATE INDEX IF NOT EXISTS swdocs_created_idx ON swdocs (created DESC, id DESC);
CREATE INDEX IF NOT EXISTS swdocs_updated_idx ON swdocs (updated DESC, id DESC);
";

const INSERT_SQL: &str = "INSERT INTO swdocs (name, user, created, updated, description, sections) \
     VALUES (?1, ?2, ?3, ?3, ?4, ?5)";

// The conflict branch never touches `id` or `created`.
const UPSERT_SQL: &str = "INSERT INTO swdocs (name, user, created, updated, description, sections) \
     VALUES (?1, ?2, ?3, ?3, ?4, ?5) \
     ON CONFLICT(name) DO UPDATE SET \
     description = excluded.description, \
     sections = excluded.sections, \
     user = excluded.user, \
     updated = excluded.updated \
     RETURNING id, created, updated";

const GET_SQL: &str =
    "SELECT id, name, user, created, updated, description, sections FROM swdocs WHERE name = ?1";

const SEARCH_SQL: &str =
    "SELECT name, user, updated FROM swdocs WHERE name LIKE ?1 ESCAPE '\\' ORDER BY name";

const RECENT_BY_CREATED_SQL: &str = "SELECT name, description, user, created, updated FROM swdocs \
     ORDER BY created DESC, id DESC LIMIT ?1";

const RECENT_BY_UPDATED_SQL: &str = "SELECT name, description, user, created, updated FROM swdocs \
     ORDER BY updated DESC, id DESC LIMIT ?1";

const DELETE_SQL: &str = "DELETE FROM swdocs WHERE name = ?1";

const LATEST_STAMP_SQL: &str = "SELECT MAX(updated) FROM swdocs";

const DEFAULT_READ_POOL_SIZE: usize = 4;
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub path: PathBuf,
    pub read_pool_size: usize,
    /// How long SQLite itself retries a locked database before failing.
    pub busy_timeout: Duration,
    /// How long a writer queues for the write gate.
    pub write_wait: Duration,
}

impl SqliteOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_pool_size: DEFAULT_READ_POOL_SIZE,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            write_wait: DEFAULT_WRITE_WAIT,
        }
    }

    pub fn with_read_pool_size(mut self, size: usize) -> Self {
        self.read_pool_size = size;
        self
    }

    pub fn with_write_wait(mut self, wait: Duration) -> Self {
        self.write_wait = wait;
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

struct Writer {
    conn: Connection,
    clock: StampClock,
}

/// Document store backed by a SQLite file.
///
/// Opened once at startup and shared for the life of the process. All
/// mutations go through the write gate; reads use a pool of separate
/// connections and never wait on a writer.
pub struct SqliteStore {
    path: PathBuf,
    writer: WriteGate<Writer>,
    readers: Vec<Mutex<Connection>>,
    read_cursor: AtomicUsize,
}

impl SqliteStore {
    pub fn open(options: SqliteOptions) -> Result<Self> {
        ensure_parent_dir(&options.path)?;

        let conn = open_connection(&options)?;
        conn.execute_batch(SCHEMA)?;
        let latest = latest_stamp(&conn)?;

        let pool_size = options.read_pool_size.max(1);
        let mut readers = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            readers.push(Mutex::new(open_connection(&options)?));
        }

        tracing::info!(
            path = %options.path.display(),
            readers = pool_size,
            "opened document store"
        );

        Ok(Self {
            path: options.path,
            writer: WriteGate::new(
                Writer {
                    conn,
                    clock: StampClock::seeded(latest),
                },
                options.write_wait,
            ),
            readers,
            read_cursor: AtomicUsize::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reader(&self) -> &Mutex<Connection> {
        let index = self.read_cursor.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        &self.readers[index]
    }

    fn list_recent_with(&self, sql: &str, limit: usize) -> Result<Vec<DocumentSummary>> {
        let conn = self.reader().lock();
        let mut stmt = conn.prepare_cached(sql)?;
        let rows = stmt.query_map(params![page_limit(limit) as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (name, description, user, created, updated) = row?;
            summaries.push(DocumentSummary {
                name,
                user,
                description: Some(description),
                created: Some(Timestamp::from_storage(&created)?),
                updated: Timestamp::from_storage(&updated)?,
            });
        }
        Ok(summaries)
    }
}

impl DocumentStore for SqliteStore {
    fn create(&self, payload: &DocumentPayload) -> Result<Document> {
        let sections = payload.sections.encode()?;
        self.writer.with(|w| {
            let stamp = w.clock.tick();
            let inserted = w.conn.prepare_cached(INSERT_SQL)?.execute(params![
                payload.name,
                payload.user,
                stamp.to_storage(),
                payload.description,
                sections,
            ]);
            match inserted {
                Ok(_) => {
                    let id = w.conn.last_insert_rowid();
                    tracing::debug!(name = %payload.name, id, "created document");
                    Ok(Document::from_payload(payload.clone(), id, stamp, stamp))
                }
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
                {
                    Err(SwdocsError::DuplicateName(payload.name.clone()))
                }
                Err(err) => Err(err.into()),
            }
        })
    }

    fn upsert(&self, payload: &DocumentPayload) -> Result<Document> {
        let sections = payload.sections.encode()?;
        self.writer.with(|w| {
            let stamp = w.clock.tick();
            let (id, created, updated): (i64, String, String) = w
                .conn
                .prepare_cached(UPSERT_SQL)?
                .query_row(
                    params![
                        payload.name,
                        payload.user,
                        stamp.to_storage(),
                        payload.description,
                        sections,
                    ],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )?;
            tracing::debug!(name = %payload.name, id, "upserted document");
            Ok(Document::from_payload(
                payload.clone(),
                id,
                Timestamp::from_storage(&created)?,
                Timestamp::from_storage(&updated)?,
            ))
        })
    }

    fn get_by_name(&self, name: &str) -> Result<Document> {
        let conn = self.reader().lock();
        let row = conn
            .prepare_cached(GET_SQL)?
            .query_row(params![name], |row| {
                Ok(StoredRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    user: row.get(2)?,
                    created: row.get(3)?,
                    updated: row.get(4)?,
                    description: row.get(5)?,
                    sections: row.get(6)?,
                })
            })
            .optional()?;

        match row {
            Some(row) => row.into_document(),
            None => Err(SwdocsError::NotFound(name.to_string())),
        }
    }

    fn search(&self, pattern: &SearchPattern) -> Result<Vec<DocumentSummary>> {
        let conn = self.reader().lock();
        let mut stmt = conn.prepare_cached(SEARCH_SQL)?;
        let rows = stmt.query_map(params![pattern.as_like()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (name, user, updated) = row?;
            summaries.push(DocumentSummary {
                name,
                user,
                description: None,
                created: None,
                updated: Timestamp::from_storage(&updated)?,
            });
        }
        Ok(summaries)
    }

    fn list_recent(&self, order: RecentOrder, limit: usize) -> Result<Vec<DocumentSummary>> {
        match order {
            RecentOrder::Created => self.list_recent_with(RECENT_BY_CREATED_SQL, limit),
            RecentOrder::Updated => self.list_recent_with(RECENT_BY_UPDATED_SQL, limit),
        }
    }

    fn delete(&self, name: &str) -> Result<bool> {
        self.writer.with(|w| {
            let removed = w.conn.prepare_cached(DELETE_SQL)?.execute(params![name])?;
            tracing::debug!(name, removed, "deleted document");
            Ok(removed > 0)
        })
    }
}

struct StoredRow {
    id: i64,
    name: String,
    user: Option<String>,
    created: String,
    updated: String,
    description: String,
    sections: String,
}

impl StoredRow {
    fn into_document(self) -> Result<Document> {
        Ok(Document {
            id: self.id,
            name: self.name,
            user: self.user,
            created: Timestamp::from_storage(&self.created)?,
            updated: Timestamp::from_storage(&self.updated)?,
            description: self.description,
            sections: Sections::decode(&self.sections)?,
        })
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(SwdocsError::Api(format!(
            "database path {} is a directory",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn open_connection(options: &SqliteOptions) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let conn = Connection::open_with_flags(&options.path, flags)?;
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
    conn.busy_timeout(options.busy_timeout)?;
    Ok(conn)
}

fn latest_stamp(conn: &Connection) -> Result<Option<Timestamp>> {
    let latest: Option<String> = conn.query_row(LATEST_STAMP_SQL, [], |row| row.get(0))?;
    latest.as_deref().map(Timestamp::from_storage).transpose()
}
