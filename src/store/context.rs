//! Transaction propagation
//!
//! A `TxContext` is threaded through every repository call. It either carries
//! the transaction an outer call already opened or nothing at all.
//! `Datastore::in_transaction` reuses the carried transaction when there is
//! one and otherwise opens (and later finishes) its own.
//!
//! The store admits a single writable transaction at a time, so a nested call
//! that opened its own writable transaction while an outer one is live would
//! block on itself. Propagation keeps every nested call inside the outer
//! transaction instead.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{Result, RouteError};

use super::{Datastore, Transaction};

/// Ambient transaction for the current logical operation
#[derive(Clone, Copy, Default)]
pub struct TxContext<'t> {
    current: Option<&'t Transaction>,
}

impl<'t> TxContext<'t> {
    /// A context with no open transaction
    pub fn empty() -> Self {
        Self { current: None }
    }

    fn attached(tx: &'t Transaction) -> Self {
        Self { current: Some(tx) }
    }

    /// The transaction carried by this context, if any
    pub fn current(&self) -> Option<&'t Transaction> {
        self.current
    }

    pub fn has_transaction(&self) -> bool {
        self.current.is_some()
    }
}

impl fmt::Debug for TxContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.current {
            Some(tx) => write!(f, "TxContext(writable={})", tx.is_writable()),
            None => f.write_str("TxContext(none)"),
        }
    }
}

impl Datastore {
    /// Run `f` inside a transaction of the requested writability
    ///
    /// - `ctx` carries no transaction: a new one is opened and this call
    ///   manages it. Success commits a writable transaction and discards a
    ///   read-only one. An error or a panic from `f` rolls a writable
    ///   transaction back before the error is returned or the panic resumed.
    /// - `ctx` carries a read-only transaction and `writable` is set: fails
    ///   with `IncompatibleTransaction` without running `f`.
    /// - otherwise the carried transaction is reused and left open; the
    ///   managing call decides its fate.
    ///
    /// `f` receives a context carrying the transaction it runs in, to hand on
    /// to nested calls. The caller's own `ctx` is left untouched.
    pub fn in_transaction<T, F>(&self, ctx: TxContext<'_>, writable: bool, f: F) -> Result<T>
    where
        F: for<'t> FnOnce(TxContext<'t>, &'t Transaction) -> Result<T>,
    {
        if let Some(tx) = ctx.current() {
            if writable && !tx.is_writable() {
                return Err(RouteError::IncompatibleTransaction);
            }
            return f(ctx, tx);
        }

        let tx = self.begin(writable)?;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(TxContext::attached(&tx), &tx)));

        match outcome {
            Ok(Ok(value)) => {
                tx.finish()?;
                if writable {
                    tracing::debug!("Committed managed transaction");
                }
                Ok(value)
            }
            Ok(Err(err)) => {
                if writable {
                    tracing::warn!("Rolling back transaction: {}", err);
                }
                if let Err(rollback_err) = tx.rollback() {
                    tracing::error!("Rollback failed: {}", rollback_err);
                }
                Err(err)
            }
            Err(payload) => {
                if writable {
                    tracing::warn!("Rolling back transaction after panic");
                }
                if let Err(rollback_err) = tx.rollback() {
                    tracing::error!("Rollback failed: {}", rollback_err);
                }
                panic::resume_unwind(payload)
            }
        }
    }
}
