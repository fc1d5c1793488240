//! Store handle and connection management

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    ops::{Deref, DerefMut},
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use sqlx::{
    Sqlite, SqlitePool, Transaction,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::schema::{self, SchemaMismatchPolicy};

pub(crate) mod columns;

/// Errors raised while opening, migrating or closing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened or configured.
    #[error("failed to open store")]
    Open(#[source] sqlx::Error),

    /// The file carries another schema version and the policy is
    /// [`SchemaMismatchPolicy::Fail`].
    #[error("store schema version {found} does not match expected version {expected}")]
    SchemaMismatch {
        /// Version stamped in the file.
        found: i64,
        /// Version this build declares.
        expected: i64,
    },

    /// Release was refused because write transactions are still open.
    #[error("cannot release store while {0} write transaction(s) are in flight")]
    WritesInFlight(usize),

    /// Any other database failure.
    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}

/// Settings used when the store is opened.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database file; created when missing.
    pub path: PathBuf,

    /// Pool size.
    pub max_connections: u32,

    /// How long a writer waits for the write lock before failing.
    pub busy_timeout: Duration,

    /// What to do when the file carries another schema version.
    pub on_schema_mismatch: SchemaMismatchPolicy,
}

impl StoreConfig {
    /// Defaults for a store file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: 4,
            busy_timeout: Duration::from_secs(5),
            on_schema_mismatch: SchemaMismatchPolicy::default(),
        }
    }
}

/// An opened store.
///
/// Cloning is cheap; clones share the same pool and the same pending-write
/// counter.
#[derive(Debug, Clone)]
pub struct Db {
    pool: SqlitePool,
    pending_writes: Arc<AtomicUsize>,
}

impl Db {
    /// Wrap an already configured pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            pending_writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Begin a transaction for reads.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection cannot be acquired.
    pub async fn begin_read(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Begin a write transaction.
    ///
    /// Every mutation made through the returned transaction is committed by
    /// [`WriteTransaction::commit`]; dropping it without committing rolls all
    /// of them back. The store cannot be released while it is alive.
    ///
    /// The write lock is taken up front (`BEGIN IMMEDIATE`), so a unit of work
    /// that reads before it writes waits out the busy timeout behind other
    /// writers instead of failing on a stale snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection cannot be acquired.
    pub async fn begin_write(&self) -> Result<WriteTransaction, sqlx::Error> {
        let pending = PendingWrite::track(&self.pending_writes);
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        Ok(WriteTransaction {
            tx,
            _pending: pending,
        })
    }

    /// Number of write transactions currently open.
    pub fn pending_writes(&self) -> usize {
        self.pending_writes.load(Ordering::Acquire)
    }

    /// Underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// A write transaction scoped to one unit of work.
pub struct WriteTransaction {
    tx: Transaction<'static, Sqlite>,
    _pending: PendingWrite,
}

impl WriteTransaction {
    /// Commit every mutation made in this transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when the commit fails, in which case nothing is kept.
    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }
}

impl Deref for WriteTransaction {
    type Target = Transaction<'static, Sqlite>;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

impl DerefMut for WriteTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tx
    }
}

impl Debug for WriteTransaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("WriteTransaction").finish_non_exhaustive()
    }
}

struct PendingWrite(Arc<AtomicUsize>);

impl PendingWrite {
    fn track(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);

        Self(Arc::clone(counter))
    }
}

impl Drop for PendingWrite {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Open the store described by `config`, creating the file and schema when
/// missing.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or the schema cannot be
/// brought to the declared version.
pub async fn open(config: &StoreConfig) -> Result<Db, StoreError> {
    let options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(config.busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(StoreError::Open)?;

    if let Err(error) = schema::ensure(&pool, config.on_schema_mismatch).await {
        pool.close().await;

        return Err(error);
    }

    Ok(Db::new(pool))
}

/// Owner of the single opened store.
///
/// Built once at start-up and handed to whatever needs persistence. The store
/// is opened on the first [`acquire`](Self::acquire); every later call returns
/// the same [`Db`] until [`release`](Self::release) closes it.
#[derive(Debug)]
pub struct StoreHandle {
    config: StoreConfig,
    slot: Mutex<Option<Arc<Db>>>,
    opened: AtomicUsize,
}

impl StoreHandle {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(None),
            opened: AtomicUsize::new(0),
        }
    }

    /// Return the shared store, opening it on first use.
    ///
    /// Concurrent callers wait on the same open; the store is opened once.
    ///
    /// # Errors
    ///
    /// Returns an error when opening the store fails. The slot stays empty and
    /// a later call tries again.
    #[instrument(skip(self), fields(path = %self.config.path.display()))]
    pub async fn acquire(&self) -> Result<Arc<Db>, StoreError> {
        let mut slot = self.slot.lock().await;

        if let Some(db) = slot.as_ref() {
            return Ok(Arc::clone(db));
        }

        let db = Arc::new(open(&self.config).await?);

        self.opened.fetch_add(1, Ordering::AcqRel);
        *slot = Some(Arc::clone(&db));

        info!("store opened");

        Ok(db)
    }

    /// Close the store and clear the slot.
    ///
    /// Releasing a handle that is not open is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WritesInFlight`] while any write transaction is
    /// still open; the store stays open in that case.
    #[instrument(skip(self), fields(path = %self.config.path.display()))]
    pub async fn release(&self) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().await;

        let pending = slot.as_ref().map_or(0, |db| db.pending_writes());

        if pending > 0 {
            return Err(StoreError::WritesInFlight(pending));
        }

        if let Some(db) = slot.take() {
            db.close().await;

            info!("store closed");
        }

        Ok(())
    }

    /// How many times the underlying store has been opened.
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::Acquire)
    }

    /// Whether the store is currently open.
    pub async fn is_open(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use sqlx::query_scalar;
    use testresult::TestResult;

    use crate::{schema::SCHEMA_VERSION, test::TestDb};

    use super::*;

    #[tokio::test]
    async fn concurrent_acquire_opens_once_and_shares_the_handle() -> TestResult {
        let test_db = TestDb::new();
        let handle = StoreHandle::new(test_db.config());

        let (a, b) = tokio::join!(handle.acquire(), handle.acquire());
        let (a, b) = (a?, b?);

        assert!(Arc::ptr_eq(&a, &b), "both callers should get the same Db");
        assert_eq!(handle.open_count(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn acquire_after_release_reopens() -> TestResult {
        let test_db = TestDb::new();
        let handle = StoreHandle::new(test_db.config());

        let first = handle.acquire().await?;
        handle.release().await?;

        assert!(!handle.is_open().await);

        let second = handle.acquire().await?;

        assert!(!Arc::ptr_eq(&first, &second), "release should drop the old Db");
        assert_eq!(handle.open_count(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn release_refuses_while_a_write_is_pending() -> TestResult {
        let test_db = TestDb::new();
        let handle = StoreHandle::new(test_db.config());
        let db = handle.acquire().await?;

        let tx = db.begin_write().await?;

        let result = handle.release().await;

        assert!(
            matches!(result, Err(StoreError::WritesInFlight(1))),
            "expected WritesInFlight(1), got {result:?}"
        );
        assert!(handle.is_open().await, "store should stay open");

        drop(tx);

        handle.release().await?;

        assert!(!handle.is_open().await);

        Ok(())
    }

    #[tokio::test]
    async fn release_without_acquire_is_noop() -> TestResult {
        let test_db = TestDb::new();
        let handle = StoreHandle::new(test_db.config());

        handle.release().await?;

        assert_eq!(handle.open_count(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn pending_write_count_follows_transaction_lifetime() -> TestResult {
        let test_db = TestDb::new();
        let db = open(&test_db.config()).await?;

        let tx = db.begin_write().await?;
        assert_eq!(db.pending_writes(), 1);

        tx.commit().await?;
        assert_eq!(db.pending_writes(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn open_stamps_schema_version() -> TestResult {
        let test_db = TestDb::new();
        let db = open(&test_db.config()).await?;

        let version: i64 = query_scalar("PRAGMA user_version")
            .fetch_one(db.pool())
            .await?;

        assert_eq!(version, SCHEMA_VERSION);

        Ok(())
    }

    #[tokio::test]
    async fn schema_mismatch_recreates_store_by_default() -> TestResult {
        let test_db = TestDb::new();
        let db = open(&test_db.config()).await?;

        sqlx::query(
            "INSERT INTO products (uuid, code, name, price, description, created_at, updated_at) \
             VALUES (x'00', 1, 'Stale', 100, '', 0, 0)",
        )
        .execute(db.pool())
        .await?;

        sqlx::raw_sql("PRAGMA user_version = 99")
            .execute(db.pool())
            .await?;

        db.close().await;

        let reopened = open(&test_db.config()).await?;

        let products: i64 = query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(reopened.pool())
            .await?;
        let version: i64 = query_scalar("PRAGMA user_version")
            .fetch_one(reopened.pool())
            .await?;

        assert_eq!(products, 0, "recreated store should be empty");
        assert_eq!(version, SCHEMA_VERSION);

        Ok(())
    }

    #[tokio::test]
    async fn schema_mismatch_fails_under_fail_policy() -> TestResult {
        let test_db = TestDb::new();
        let db = open(&test_db.config()).await?;

        sqlx::raw_sql("PRAGMA user_version = 99")
            .execute(db.pool())
            .await?;

        db.close().await;

        let mut config = test_db.config();
        config.on_schema_mismatch = SchemaMismatchPolicy::Fail;

        let result = open(&config).await;

        assert!(
            matches!(
                result,
                Err(StoreError::SchemaMismatch {
                    found: 99,
                    expected: SCHEMA_VERSION
                })
            ),
            "expected SchemaMismatch, got {result:?}"
        );

        Ok(())
    }
}
