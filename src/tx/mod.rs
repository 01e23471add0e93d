//! Unit of work: one business operation, one connection, one atomic outcome.
//!
//! `run_in_transaction` acquires a handle, opens a transaction, runs the
//! caller's closure against that same handle, then commits on `Ok` and rolls
//! back on `Err` or cancellation. The handle is released in every case,
//! including when commit or rollback fails or the closure panics.
//!
//! Any error rolls back. There is no error type that still commits.

use crate::db::pool::{ConnectionProvider, Handle};
use crate::db::translate::translate;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info_span, warn};

/// Lifecycle of a unit of work.
///
/// `Idle → Started → {Committing → Committed, RollingBack → RolledBack} → Released`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Idle,
    Started,
    Committing,
    Committed,
    RollingBack,
    RolledBack,
    Released,
}

/// Best-effort cancellation flag shared between a unit of work and whoever may cancel it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What the business closure sees: the bound connection and the cancel flag.
///
/// Borrowing the connection keeps the context on the thread that runs the
/// unit of work; it cannot outlive the transaction.
pub struct TxContext<'a> {
    conn: &'a Connection,
    cancel: &'a CancelToken,
    operation: &'a str,
}

impl<'a> TxContext<'a> {
    /// The connection bound to this unit of work.
    ///
    /// Transaction control belongs to the coordinator. Issuing `COMMIT`,
    /// `ROLLBACK` or `BEGIN` through it ends the transaction early: writes made
    /// before such a `COMMIT` stay durable even if the closure then fails.
    pub fn conn(&self) -> &'a Connection {
        self.conn
    }

    pub fn operation(&self) -> &str {
        self.operation
    }

    /// Fail with `Cancelled` if cancellation was requested.
    pub fn checkpoint(&self) -> AppResult<()> {
        if self.cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        Ok(())
    }
}

/// A transaction bound to one handle. Dropping it rolls back and releases.
pub struct UnitOfWork<'p, P: ConnectionProvider + ?Sized> {
    provider: &'p P,
    handle: Option<Handle>,
    state: TxState,
    operation: String,
}

impl<'p, P: ConnectionProvider + ?Sized> UnitOfWork<'p, P> {
    /// Acquire a handle and open a transaction on it.
    pub fn begin(provider: &'p P, operation: &str) -> AppResult<Self> {
        let handle = provider.acquire()?;
        let mut uow = Self {
            provider,
            handle: Some(handle),
            state: TxState::Idle,
            operation: operation.to_string(),
        };

        // IMMEDIATE takes the write lock up front, so two units of work never
        // deadlock upgrading from read to write.
        if let Err(e) = uow.conn().execute_batch("BEGIN IMMEDIATE") {
            let err = translate(operation, "BEGIN IMMEDIATE", e);
            uow.release();
            return Err(err);
        }

        uow.state = TxState::Started;
        debug!(operation, connection = uow.handle_id(), "transaction started");
        Ok(uow)
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    fn handle_id(&self) -> u64 {
        self.handle.as_ref().map(Handle::id).unwrap_or_default()
    }

    /// The bound connection.
    ///
    /// # Panics
    /// After `release`. The coordinator never calls it past that point.
    pub fn conn(&self) -> &Connection {
        match &self.handle {
            Some(h) => h.conn(),
            None => panic!("unit of work '{}' used after release", self.operation),
        }
    }

    /// Commit. On failure the transaction is rolled back and `Commit` returned.
    pub fn commit(&mut self) -> AppResult<()> {
        if self.state != TxState::Started {
            return Err(AppError::Commit(format!(
                "cannot commit '{}' in state {:?}",
                self.operation, self.state
            )));
        }

        self.state = TxState::Committing;
        match self.conn().execute_batch("COMMIT") {
            Ok(()) => {
                self.state = TxState::Committed;
                debug!(operation = %self.operation, "transaction committed");
                Ok(())
            }
            Err(e) => {
                error!(operation = %self.operation, error = %e, "commit failed, rolling back");
                self.rollback();
                Err(AppError::Commit(e.to_string()))
            }
        }
    }

    /// Roll back. Failures are logged; the handle is then discarded on release.
    pub fn rollback(&mut self) {
        if !matches!(self.state, TxState::Started | TxState::Committing) {
            return;
        }

        self.state = TxState::RollingBack;
        let conn = self.conn();
        if conn.is_autocommit() {
            warn!(
                operation = %self.operation,
                "transaction already closed before rollback, earlier writes may be durable"
            );
        } else if let Err(e) = conn.execute_batch("ROLLBACK") {
            error!(operation = %self.operation, error = %e, "rollback failed");
        }
        self.state = TxState::RolledBack;
        debug!(operation = %self.operation, "transaction rolled back");
    }

    /// Restore auto-commit and hand the connection back. Runs at most once.
    pub fn release(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        if let Err(e) = handle.restore_autocommit() {
            warn!(operation = %self.operation, error = %e, "could not restore auto-commit");
        }
        if let Err(e) = self.provider.release(handle) {
            warn!(operation = %self.operation, error = %e, "connection release failed");
        }
        self.state = TxState::Released;
    }
}

impl<P: ConnectionProvider + ?Sized> Drop for UnitOfWork<'_, P> {
    fn drop(&mut self) {
        if self.handle.is_none() {
            return;
        }
        if matches!(self.state, TxState::Started | TxState::Committing) {
            warn!(operation = %self.operation, "unit of work dropped while open, rolling back");
            self.rollback();
        }
        self.release();
    }
}

/// Run `f` as one unit of work on a connection from `provider`.
pub fn run_in_transaction<P, T, F>(provider: &P, operation: &str, f: F) -> AppResult<T>
where
    P: ConnectionProvider + ?Sized,
    F: FnOnce(&TxContext<'_>) -> AppResult<T>,
{
    run_cancellable(provider, operation, &CancelToken::new(), f)
}

/// Like `run_in_transaction`, but rolls back with `Cancelled` once `cancel` fires.
pub fn run_cancellable<P, T, F>(
    provider: &P,
    operation: &str,
    cancel: &CancelToken,
    f: F,
) -> AppResult<T>
where
    P: ConnectionProvider + ?Sized,
    F: FnOnce(&TxContext<'_>) -> AppResult<T>,
{
    let span = info_span!("unit_of_work", operation);
    let _enter = span.enter();

    let mut uow =
        UnitOfWork::begin(provider, operation).map_err(|e| AppError::transaction(operation, e))?;

    let outcome = {
        let ctx = TxContext {
            conn: uow.conn(),
            cancel,
            operation,
        };
        f(&ctx).and_then(|value| ctx.checkpoint().map(|()| value))
    };

    let result = match outcome {
        Ok(value) => uow.commit().map(|()| value),
        Err(cause) => {
            warn!(error = %cause, "operation failed, rolling back");
            uow.rollback();
            Err(cause)
        }
    };

    uow.release();
    result.map_err(|cause| AppError::transaction(operation, cause))
}

/// Owns a provider and runs units of work against it.
#[derive(Debug, Clone)]
pub struct TxManager<P> {
    provider: P,
}

impl<P: ConnectionProvider> TxManager<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn run_in_transaction<T, F>(&self, operation: &str, f: F) -> AppResult<T>
    where
        F: FnOnce(&TxContext<'_>) -> AppResult<T>,
    {
        run_in_transaction(&self.provider, operation, f)
    }

    pub fn run_cancellable<T, F>(&self, operation: &str, cancel: &CancelToken, f: F) -> AppResult<T>
    where
        F: FnOnce(&TxContext<'_>) -> AppResult<T>,
    {
        run_cancellable(&self.provider, operation, cancel, f)
    }
}
