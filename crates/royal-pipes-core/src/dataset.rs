//! Read-only handle to the speech analytics dataset.
//!
//! The dataset is a SQLite file produced by the ingestion pipeline. It is
//! located under the data home (`$XDG_DATA_HOME/royal-pipes/analytics.db`,
//! falling back to `~/.local/share/royal-pipes/analytics.db`) unless a path is
//! configured, and is always opened read-only. Nothing in this crate creates
//! or writes it.
//!
//! [`Dataset::shared`] gives a process-wide handle opened on first use; every
//! caller after that reuses the same connection.

use std::sync::{Mutex, OnceLock};

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::{Connection, OpenFlags};

use crate::error::{DatasetError, DatasetResult};

/// Directory name under the data home.
pub const DATA_DIR_NAME: &str = "royal-pipes";

/// Dataset file name inside [`DATA_DIR_NAME`].
pub const DATASET_FILE_NAME: &str = "analytics.db";

/// Tables the query layer reads.
///
/// Documents the contract a compatible dataset must satisfy. The crate
/// never executes this against an opened dataset.
pub const SCHEMA: &str = "
CREATE TABLE speech (
    year INTEGER PRIMARY KEY,
    monarch TEXT NOT NULL
);
CREATE TABLE word_count (
    word TEXT NOT NULL,
    year INTEGER NOT NULL,
    count INTEGER NOT NULL CHECK (count >= 0),
    is_stopword INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (word, year)
);
CREATE TABLE odds_count (
    word TEXT NOT NULL,
    year INTEGER NOT NULL,
    count INTEGER NOT NULL CHECK (count >= 0),
    PRIMARY KEY (word, year)
);
CREATE TABLE odds (
    word TEXT PRIMARY KEY,
    odds REAL NOT NULL
);
CREATE TABLE person_count (
    entity TEXT NOT NULL,
    year INTEGER NOT NULL,
    count INTEGER NOT NULL CHECK (count >= 0),
    PRIMARY KEY (entity, year)
);
CREATE TABLE place_count (
    entity TEXT NOT NULL,
    year INTEGER NOT NULL,
    count INTEGER NOT NULL CHECK (count >= 0),
    PRIMARY KEY (entity, year)
);
CREATE TABLE wlo_comparisons (
    comparison_id INTEGER PRIMARY KEY,
    comparison_type TEXT NOT NULL CHECK (comparison_type IN ('decade', 'monarch')),
    focal_value TEXT NOT NULL,
    background_type TEXT NOT NULL,
    alpha REAL NOT NULL,
    focal_corpus_size INTEGER NOT NULL,
    background_corpus_size INTEGER NOT NULL
);
CREATE TABLE wlo_words (
    comparison_id INTEGER NOT NULL REFERENCES wlo_comparisons (comparison_id),
    word TEXT NOT NULL,
    rank INTEGER NOT NULL,
    wlo_score REAL NOT NULL,
    focal_count INTEGER NOT NULL,
    background_count INTEGER NOT NULL,
    focal_rate REAL NOT NULL,
    background_rate REAL NOT NULL,
    z_score REAL NOT NULL,
    PRIMARY KEY (comparison_id, word),
    UNIQUE (comparison_id, rank)
);
";

static SHARED: OnceLock<Dataset> = OnceLock::new();

/// A read-only dataset connection, safe to share between threads.
#[derive(Debug)]
pub struct Dataset {
    conn: Mutex<Connection>,
    path: Option<Utf8PathBuf>,
}

impl Dataset {
    /// Open the dataset at `path` read-only.
    ///
    /// Fails with [`DatasetError::NotFound`] if the file does not exist.
    #[tracing::instrument(skip(path), fields(path = %path))]
    pub fn open(path: &Utf8Path) -> DatasetResult<Self> {
        if !path.is_file() {
            return Err(DatasetError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let conn = Connection::open_with_flags(
            path.as_std_path(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::info!(path = %path, "dataset opened read-only");
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an existing connection (e.g. an in-memory fixture).
    ///
    /// The connection is switched to `query_only` so it cannot be written
    /// through this handle.
    pub fn from_connection(conn: Connection) -> DatasetResult<Self> {
        conn.pragma_update(None, "query_only", true)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// The process-wide handle, opening `path` on first call.
    ///
    /// Later calls return the already-open handle and ignore `path`. The
    /// handle lives until process exit.
    pub fn shared(path: &Utf8Path) -> DatasetResult<&'static Self> {
        if let Some(existing) = SHARED.get() {
            return Ok(existing);
        }
        let opened = Self::open(path)?;
        Ok(SHARED.get_or_init(|| opened))
    }

    /// File path, if opened from disk.
    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    /// Run `f` against the connection.
    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> DatasetResult<T> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        f(&conn).map_err(DatasetError::from)
    }
}

/// Resolve the default dataset path.
///
/// `$XDG_DATA_HOME/royal-pipes/analytics.db` when `XDG_DATA_HOME` is set and
/// non-empty, otherwise `~/.local/share/royal-pipes/analytics.db`.
pub fn default_dataset_path() -> DatasetResult<Utf8PathBuf> {
    let xdg = std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|v| !v.is_empty());
    dataset_path_from(xdg.as_deref())
}

fn dataset_path_from(xdg_data_home: Option<&str>) -> DatasetResult<Utf8PathBuf> {
    let base = if let Some(dir) = xdg_data_home {
        Utf8PathBuf::from(dir)
    } else {
        let dirs = directories::BaseDirs::new().ok_or(DatasetError::NoDataHome)?;
        let home = Utf8PathBuf::from_path_buf(dirs.home_dir().to_path_buf())
            .map_err(|_| DatasetError::NoDataHome)?;
        home.join(".local").join("share")
    };
    Ok(base.join(DATA_DIR_NAME).join(DATASET_FILE_NAME))
}

/// Clamp a stored count to the non-negative domain.
pub(crate) fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
