//! Bounded SQLite connection pool.
//!
//! Connections are opened lazily up to `max_size`. `acquire` blocks until a
//! connection is idle or the acquire timeout elapses. A `Handle` owns its
//! connection exclusively and goes back to the pool only through `release`,
//! which consumes it.

use crate::config::{Config, PoolConfig};
use crate::errors::{AppError, AppResult};
use parking_lot::{Condvar, Mutex};
use rusqlite::Connection;
use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Source of connections for units of work.
pub trait ConnectionProvider: Send + Sync {
    fn acquire(&self) -> AppResult<Handle>;
    fn release(&self, handle: Handle) -> AppResult<()>;
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for Arc<P> {
    fn acquire(&self) -> AppResult<Handle> {
        (**self).acquire()
    }

    fn release(&self, handle: Handle) -> AppResult<()> {
        (**self).release(handle)
    }
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for &P {
    fn acquire(&self) -> AppResult<Handle> {
        (**self).acquire()
    }

    fn release(&self, handle: Handle) -> AppResult<()> {
        (**self).release(handle)
    }
}

/// An exclusively owned connection drawn from a provider.
pub struct Handle {
    id: u64,
    conn: Connection,
}

impl Handle {
    pub fn new(id: u64, conn: Connection) -> Self {
        Self { id, conn }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// False while a transaction is open on this connection.
    pub fn is_autocommit(&self) -> bool {
        self.conn.is_autocommit()
    }

    /// Roll back any transaction left open so the connection is back in
    /// auto-commit mode.
    pub fn restore_autocommit(&self) -> AppResult<()> {
        if self.conn.is_autocommit() {
            return Ok(());
        }
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| AppError::Release(format!("connection #{}: {}", self.id, e)))
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("id", &self.id)
            .field("autocommit", &self.conn.is_autocommit())
            .finish()
    }
}

/// Pool counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub created: u64,
    pub acquired: u64,
    pub released: u64,
    pub discarded: u64,
    pub timeouts: u64,
    pub idle: usize,
    pub in_use: usize,
}

struct PoolState {
    idle: VecDeque<Handle>,
    /// Open connections, idle or in use.
    total: usize,
    next_id: u64,
    stats: PoolStats,
}

pub struct DbPool {
    path: PathBuf,
    config: PoolConfig,
    state: Mutex<PoolState>,
    available: Condvar,
}

impl fmt::Debug for DbPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbPool")
            .field("path", &self.path)
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl DbPool {
    /// Pool over the database at `path` with default settings.
    pub fn new(path: impl AsRef<Path>) -> AppResult<Self> {
        Self::with_config(path, PoolConfig::default())
    }

    pub fn with_config(path: impl AsRef<Path>, config: PoolConfig) -> AppResult<Self> {
        config.validate()?;
        info!(
            path = %path.as_ref().display(),
            max_size = config.max_size,
            "connection pool created"
        );
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            config,
            state: Mutex::new(PoolState {
                idle: VecDeque::new(),
                total: 0,
                next_id: 1,
                stats: PoolStats::default(),
            }),
            available: Condvar::new(),
        })
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        Self::with_config(&cfg.database, cfg.pool.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn stats(&self) -> PoolStats {
        let state = self.state.lock();
        let mut stats = state.stats.clone();
        stats.idle = state.idle.len();
        stats.in_use = state.total - state.idle.len();
        stats
    }

    /// Run `func` on a pooled connection in auto-commit mode, releasing it afterwards.
    pub fn with_conn<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let handle = self.acquire()?;
        let result = func(handle.conn());
        if let Err(e) = self.release(handle) {
            warn!(error = %e, "release after auto-commit call failed");
        }
        result
    }

    fn open(&self, id: u64) -> AppResult<Handle> {
        let conn = Connection::open(&self.path)
            .map_err(|e| AppError::Acquisition(format!("{}: {}", self.path.display(), e)))?;
        conn.busy_timeout(self.config.busy_timeout())
            .map_err(|e| AppError::Acquisition(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| AppError::Acquisition(e.to_string()))?;
        debug!(connection = id, "opened new connection");
        Ok(Handle::new(id, conn))
    }
}

impl ConnectionProvider for DbPool {
    fn acquire(&self) -> AppResult<Handle> {
        let deadline = Instant::now() + self.config.acquire_timeout();
        let mut state = self.state.lock();

        loop {
            if let Some(handle) = state.idle.pop_front() {
                state.stats.acquired += 1;
                debug!(connection = handle.id(), "acquired idle connection");
                return Ok(handle);
            }

            if state.total < self.config.max_size {
                // Reserve the slot, then open without holding the lock.
                state.total += 1;
                let id = state.next_id;
                state.next_id += 1;
                drop(state);

                return match self.open(id) {
                    Ok(handle) => {
                        let mut state = self.state.lock();
                        state.stats.created += 1;
                        state.stats.acquired += 1;
                        Ok(handle)
                    }
                    Err(e) => {
                        let mut state = self.state.lock();
                        state.total -= 1;
                        self.available.notify_one();
                        Err(e)
                    }
                };
            }

            if self.available.wait_until(&mut state, deadline).timed_out()
                && state.idle.is_empty()
                && state.total >= self.config.max_size
            {
                state.stats.timeouts += 1;
                warn!(
                    max_size = self.config.max_size,
                    timeout_ms = self.config.acquire_timeout_ms,
                    "connection pool exhausted"
                );
                return Err(AppError::Acquisition(format!(
                    "pool exhausted: {} connection(s) in use after {} ms",
                    state.total, self.config.acquire_timeout_ms
                )));
            }
        }
    }

    fn release(&self, handle: Handle) -> AppResult<()> {
        let restored = handle.restore_autocommit();
        let id = handle.id();

        let mut state = self.state.lock();
        state.stats.released += 1;

        let result = match restored {
            Ok(()) => {
                state.idle.push_back(handle);
                debug!(connection = id, "connection returned to pool");
                Ok(())
            }
            Err(e) => {
                // A connection stuck inside a transaction is never reused.
                state.total -= 1;
                state.stats.discarded += 1;
                drop(handle);
                warn!(connection = id, error = %e, "connection discarded");
                Err(e)
            }
        };

        self.available.notify_one();
        result
    }
}
