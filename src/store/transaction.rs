//! Transactions
//!
//! A physical transaction against the datastore, plus raw byte access to the
//! two keyspaces. Typed access lives in the route repository.

use redb::{ReadTransaction, ReadableTable, TableDefinition, TableError, WriteTransaction};

use crate::error::{Result, RouteError};

type RawTable = TableDefinition<'static, &'static [u8], &'static [u8]>;

const ROUTES: RawTable = TableDefinition::new("routes");
const MAPS: RawTable = TableDefinition::new("maps");

/// Logical keyspaces stored in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyspace {
    /// Route records keyed by route id
    Routes,

    /// Map records keyed by channel id
    Maps,
}

impl Keyspace {
    fn table(self) -> RawTable {
        match self {
            Keyspace::Routes => ROUTES,
            Keyspace::Maps => MAPS,
        }
    }
}

/// An open transaction, either read-only or writable
pub enum Transaction {
    Read(ReadTransaction),
    Write(WriteTransaction),
}

impl Transaction {
    /// Whether this transaction may mutate the store
    pub fn is_writable(&self) -> bool {
        matches!(self, Transaction::Write(_))
    }

    /// Visit every entry of a keyspace in key order
    ///
    /// A keyspace that was never written to is treated as empty.
    pub fn scan<F>(&self, keyspace: Keyspace, mut visit: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]) -> Result<()>,
    {
        match self {
            Transaction::Read(rtx) => match rtx.open_table(keyspace.table()) {
                Ok(table) => visit_all(&table, &mut visit),
                Err(TableError::TableDoesNotExist(_)) => Ok(()),
                Err(e) => Err(e.into()),
            },
            Transaction::Write(wtx) => {
                let table = wtx.open_table(keyspace.table())?;
                visit_all(&table, &mut visit)
            }
        }
    }

    /// Get the value stored under `key`
    pub fn get(&self, keyspace: Keyspace, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self {
            Transaction::Read(rtx) => match rtx.open_table(keyspace.table()) {
                Ok(table) => lookup(&table, key),
                Err(TableError::TableDoesNotExist(_)) => Ok(None),
                Err(e) => Err(e.into()),
            },
            Transaction::Write(wtx) => {
                let table = wtx.open_table(keyspace.table())?;
                lookup(&table, key)
            }
        }
    }

    /// Insert or overwrite the value under `key`
    pub fn put(&self, keyspace: Keyspace, key: &[u8], value: &[u8]) -> Result<()> {
        let wtx = self.writer()?;
        let mut table = wtx.open_table(keyspace.table())?;
        table.insert(key, value)?;
        Ok(())
    }

    /// Remove `key`; returns whether it was present
    pub fn delete(&self, keyspace: Keyspace, key: &[u8]) -> Result<bool> {
        let wtx = self.writer()?;
        let mut table = wtx.open_table(keyspace.table())?;
        let removed = table.remove(key)?.is_some();
        Ok(removed)
    }

    fn writer(&self) -> Result<&WriteTransaction> {
        match self {
            Transaction::Write(wtx) => Ok(wtx),
            Transaction::Read(_) => Err(RouteError::IncompatibleTransaction),
        }
    }

    /// Make the transaction's effects durable (writable) or release the
    /// snapshot (read-only)
    pub(crate) fn finish(self) -> Result<()> {
        match self {
            Transaction::Write(wtx) => wtx.commit()?,
            Transaction::Read(rtx) => drop(rtx),
        }
        Ok(())
    }

    /// Discard every change made in this transaction
    pub(crate) fn rollback(self) -> Result<()> {
        match self {
            Transaction::Write(wtx) => wtx.abort()?,
            Transaction::Read(rtx) => drop(rtx),
        }
        Ok(())
    }
}

fn visit_all<T, F>(table: &T, visit: &mut F) -> Result<()>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
    F: FnMut(&[u8], &[u8]) -> Result<()>,
{
    for entry in table.iter()? {
        let (key, value) = entry?;
        visit(key.value(), value.value())?;
    }
    Ok(())
}

fn lookup<T>(table: &T, key: &[u8]) -> Result<Option<Vec<u8>>>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
}
