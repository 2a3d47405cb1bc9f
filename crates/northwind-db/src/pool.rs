//! # Database Handle and Sessions
//!
//! The context factory of the sample: a [`Database`] built from a connection
//! string hands out short-lived [`Session`]s.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Lifecycle                                  │
//! │                                                                         │
//! │  DbConfig::from_connection_string("northwind.db")                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await  ← lazy: nothing is opened yet            │
//! │       │                                                                 │
//! │       │   one operation                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────┐                             │
//! │  │ let mut session = db.session().await?; │ ← connection acquired      │
//! │  │ session.categories().get_by_id(1)      │                             │
//! │  │ ...                                    │                             │
//! │  └───────────────────────────────────────┘ ← dropped: connection back  │
//! │                                               on every exit path       │
//! │                                                                         │
//! │  Pool size defaults to 1: exactly one session in flight.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{
    Sqlite, SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePoolOptions,
    SqliteSynchronous,
};
use sqlx::SqlitePool;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, trace};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::category::CategoryRepository;
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::report::ReportRepository;
use crate::repository::supplier::SupplierRepository;

const IN_MEMORY_URL: &str = "sqlite::memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives.
///
/// File paths are kept as paths and never pass through URL parsing, so
/// `?`, `#` and `%` in directory names are plain characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbSource {
    /// A sqlx URL such as `sqlite://northwind.db?mode=ro` or `sqlite::memory:`.
    Url(String),
    /// A database file on disk.
    File(PathBuf),
}

impl fmt::Display for DbSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbSource::Url(url) => f.write_str(url),
            DbSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::from_connection_string("sqlite://northwind.db")?
///     .connect_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database location, resolved from the connection string.
    pub source: DbSource,

    /// Maximum number of pooled connections.
    /// Default: 1 (one in-flight session per call site)
    pub max_connections: u32,

    /// Connections kept open while idle.
    /// Default: 0, 1 for in-memory databases (the data lives in that connection)
    pub min_connections: u32,

    /// How long `session()` waits for a connection.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. `None` keeps it forever.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Create the database file if it does not exist.
    /// Default: false (a missing file is a connectivity error)
    pub create_if_missing: bool,

    /// Whether to run the schema bootstrap on startup.
    /// Default: false
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a configuration from a connection string.
    ///
    /// ## Accepted Forms
    /// - `sqlite://northwind.db`, `sqlite::memory:` (sqlx URLs, used verbatim)
    /// - `Data Source=northwind.db;Mode=ReadWrite` (ADO.NET style, the
    ///   `Data Source`/`Filename` key is used)
    /// - `./data/northwind.db` (a bare path)
    ///
    /// ## Errors
    /// `DbError::InvalidConnectionString` if the string is blank or an
    /// ADO.NET style string names no data source.
    pub fn from_connection_string(connection_string: &str) -> DbResult<Self> {
        let source = parse_source(connection_string)?;
        Ok(DbConfig::with_source(source))
    }

    fn with_source(source: DbSource) -> Self {
        DbConfig {
            source,
            max_connections: 1,
            min_connections: 0,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            create_if_missing: false,
            run_migrations: false,
        }
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// The schema is bootstrapped on startup, and the single connection is
    /// kept open for the lifetime of the handle.
    pub fn in_memory() -> Self {
        DbConfig {
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            create_if_missing: true,
            run_migrations: true,
            ..DbConfig::with_source(DbSource::Url(IN_MEMORY_URL.to_string()))
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether a missing database file is created.
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Sets whether to run the schema bootstrap on startup.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// True for `sqlite::memory:` style URLs.
    pub fn is_in_memory(&self) -> bool {
        match &self.source {
            DbSource::Url(url) => url.contains(":memory:") || url.contains("mode=memory"),
            DbSource::File(_) => false,
        }
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.source {
            DbSource::Url(url) => SqliteConnectOptions::from_str(url)
                .map_err(|e| DbError::InvalidConnectionString(e.to_string()))?,
            DbSource::File(path) => SqliteConnectOptions::new().filename(path),
        };

        // SQLite has foreign keys disabled by default for backwards compatibility
        let mut options = options.foreign_keys(true);

        if self.create_if_missing {
            options = options.create_if_missing(true);
        }

        if !self.is_in_memory() {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        Ok(options)
    }
}

/// Resolves the accepted connection string forms to a [`DbSource`].
fn parse_source(connection_string: &str) -> DbResult<DbSource> {
    let trimmed = connection_string.trim();

    if trimmed.is_empty() {
        return Err(DbError::InvalidConnectionString(
            "connection string is empty".to_string(),
        ));
    }

    if trimmed.starts_with("sqlite:") {
        return Ok(DbSource::Url(trimmed.to_string()));
    }

    if trimmed.contains('=') {
        let data_source = trimmed
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| {
                let key = key.trim();
                key.eq_ignore_ascii_case("data source")
                    || key.eq_ignore_ascii_case("datasource")
                    || key.eq_ignore_ascii_case("filename")
            })
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                DbError::InvalidConnectionString(
                    "no Data Source in connection string".to_string(),
                )
            })?;

        return Ok(if data_source == ":memory:" {
            DbSource::Url(IN_MEMORY_URL.to_string())
        } else {
            DbSource::File(PathBuf::from(data_source))
        });
    }

    Ok(DbSource::File(PathBuf::from(trimmed)))
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the Northwind database.
///
/// Cheap to clone. Hands out [`Session`]s; nothing is shared between
/// operations except the pool they come from.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Creates the database handle.
    ///
    /// ## What This Does
    /// 1. Parses the connection options (fails on malformed URLs)
    /// 2. Builds a lazy pool: no connection is opened here
    /// 3. Runs the schema bootstrap if enabled (this is the first use)
    ///
    /// An unreachable database therefore surfaces from the first
    /// [`Database::session`] call, as `DbError::ConnectionFailed`.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(source = %config.source, "Initializing database handle");

        let connect_options = config.connect_options()?;

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(None)
            .connect_lazy_with(connect_options);

        debug!(
            max_connections = config.max_connections,
            "Database pool configured"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Opens a scoped session.
    ///
    /// The session owns one connection until it is dropped.
    ///
    /// ## Errors
    /// - `DbError::ConnectionFailed` - the database cannot be opened
    /// - `DbError::PoolExhausted` - another session is still open
    pub async fn session(&self) -> DbResult<Session> {
        let conn = self.pool.acquire().await.map_err(|e| match e {
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            other => DbError::ConnectionFailed(other.to_string()),
        })?;

        trace!("Session opened");
        Ok(Session { conn })
    }

    /// Runs the embedded schema bootstrap.
    ///
    /// Idempotent: applied scripts are recorded in `_sqlx_migrations`.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Applying Northwind schema");
        let mut session = self.session().await?;
        migrations::run_migrations(session.connection()).await?;
        Ok(())
    }

    /// Returns `(total, applied)` schema script counts.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        let mut session = self.session().await?;
        migrations::migration_status(session.connection()).await
    }

    /// Closes the pool. Later sessions fail with `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is reachable (can execute queries).
    pub async fn health_check(&self) -> bool {
        match self.session().await {
            Ok(mut session) => sqlx::query("SELECT 1")
                .execute(session.connection())
                .await
                .is_ok(),
            Err(_) => false,
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// A unit of work bound to one pooled connection.
///
/// Repositories borrow the session's connection, so only one of them is
/// active at a time. Dropping the session returns the connection.
///
/// ## Usage
/// ```rust,ignore
/// let mut session = db.session().await?;
/// let customers = session.customers().top_by_company_desc(10).await?;
/// // session dropped here
/// ```
#[derive(Debug)]
pub struct Session {
    conn: PoolConnection<Sqlite>,
}

impl Session {
    /// Raw connection for queries not covered by repositories.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    pub fn categories(&mut self) -> CategoryRepository<'_> {
        CategoryRepository::new(&mut self.conn)
    }

    pub fn products(&mut self) -> ProductRepository<'_> {
        ProductRepository::new(&mut self.conn)
    }

    pub fn suppliers(&mut self) -> SupplierRepository<'_> {
        SupplierRepository::new(&mut self.conn)
    }

    pub fn customers(&mut self) -> CustomerRepository<'_> {
        CustomerRepository::new(&mut self.conn)
    }

    /// Joins, groupings and the raw report.
    pub fn reports(&mut self) -> ReportRepository<'_> {
        ReportRepository::new(&mut self.conn)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        trace!("Session released");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        let (total, applied) = db.migration_status().await.unwrap();
        assert_eq!(total, applied);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::from_connection_string("northwind.db")
            .unwrap()
            .max_connections(3)
            .connect_timeout(Duration::from_secs(2))
            .run_migrations(true);

        assert_eq!(config.source, DbSource::File(PathBuf::from("northwind.db")));
        assert_eq!(config.max_connections, 3);
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert!(config.run_migrations);
        assert!(!config.create_if_missing);
    }

    #[test]
    fn test_empty_connection_string_is_rejected() {
        for blank in ["", "   "] {
            let err = DbConfig::from_connection_string(blank).unwrap_err();
            assert!(matches!(err, DbError::InvalidConnectionString(_)));
        }
    }

    #[test]
    fn test_connection_string_forms() {
        assert_eq!(
            parse_source("sqlite://data/nw.db?mode=ro").unwrap(),
            DbSource::Url("sqlite://data/nw.db?mode=ro".to_string())
        );
        assert_eq!(
            parse_source("Data Source=northwind.db;Cache=Shared").unwrap(),
            DbSource::File(PathBuf::from("northwind.db"))
        );
        assert_eq!(
            parse_source("DataSource=:memory:").unwrap(),
            DbSource::Url(IN_MEMORY_URL.to_string())
        );
        assert_eq!(
            parse_source("./data/a?b#c%20/nw.db").unwrap(),
            DbSource::File(PathBuf::from("./data/a?b#c%20/nw.db"))
        );
        assert!(parse_source("Server=.;Database=Northwind").is_err());
    }

    #[tokio::test]
    async fn test_path_with_url_characters_opens_that_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a?b#c%d");
        std::fs::create_dir(&nested).unwrap();
        let db_path = nested.join("nw.db");

        for connection_string in [
            db_path.to_str().unwrap().to_string(),
            format!("Data Source={}", db_path.display()),
        ] {
            let config = DbConfig::from_connection_string(&connection_string)
                .unwrap()
                .create_if_missing(true)
                .run_migrations(true);
            let db = Database::new(config).await.unwrap();
            assert!(db.health_check().await);
            db.close().await;
        }

        assert!(db_path.exists());
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(DbConfig::in_memory().is_in_memory());
        assert!(!DbConfig::from_connection_string("nw.db").unwrap().is_in_memory());
    }

    #[tokio::test]
    async fn test_construction_is_lazy_and_first_use_fails() {
        let config = DbConfig::from_connection_string("/nonexistent-dir/northwind.db")
            .unwrap()
            .connect_timeout(Duration::from_secs(1));

        // No I/O yet
        let db = Database::new(config).await.unwrap();

        assert!(db.session().await.is_err());
        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_single_session_in_flight() {
        let db = Database::new(DbConfig::in_memory().connect_timeout(Duration::from_millis(200)))
            .await
            .unwrap();

        let first = db.session().await.unwrap();
        let second = db.session().await;
        assert!(matches!(second, Err(DbError::PoolExhausted)));

        drop(first);
        assert!(db.session().await.is_ok());
    }
}
