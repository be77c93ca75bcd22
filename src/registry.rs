//! TableRegistry: generational handles for tables.
//!
//! `ChainedTable::destroy` consumes the table, which rules out reuse at
//! compile time. Callers that need to pass tables around by an opaque id
//! get the same guarantee at runtime here: a destroyed handle never
//! resolves again, even when its arena slot is reused.

use crate::error::TableError;
use crate::hash::{BucketHasher, Polynomial37};
use crate::table::{ChainedTable, Teardown};
use log::{debug, warn};
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Opaque, copyable id of a table owned by a [`TableRegistry`].
    pub struct TableHandle;
}

#[derive(Debug)]
pub struct TableRegistry<V, H = Polynomial37> {
    tables: SlotMap<TableHandle, ChainedTable<V, H>>,
}

impl<V, H> Default for TableRegistry<V, H> {
    fn default() -> Self {
        Self {
            tables: SlotMap::with_key(),
        }
    }
}

impl<V> TableRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V, H> TableRegistry<V, H>
where
    H: BucketHasher,
{
    /// Create a table using `H::default()` as its hasher.
    pub fn create(&mut self, bucket_count: usize) -> Result<TableHandle, TableError>
    where
        H: Default,
    {
        self.create_with_hasher(bucket_count, H::default())
    }

    pub fn create_with_hasher(
        &mut self,
        bucket_count: usize,
        hasher: H,
    ) -> Result<TableHandle, TableError> {
        let table = ChainedTable::with_hasher(bucket_count, hasher)?;
        let handle = self.tables.insert(table);
        debug!("registered table {:?}", handle);
        Ok(handle)
    }

    /// Number of live tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn contains(&self, handle: TableHandle) -> bool {
        self.tables.contains_key(handle)
    }

    pub fn get(&self, handle: TableHandle) -> Result<&ChainedTable<V, H>, TableError> {
        self.tables.get(handle).ok_or_else(|| stale(handle))
    }

    pub fn get_mut(&mut self, handle: TableHandle) -> Result<&mut ChainedTable<V, H>, TableError> {
        self.tables.get_mut(handle).ok_or_else(|| stale(handle))
    }

    pub fn insert(&mut self, handle: TableHandle, key: &str, value: V) -> Result<Option<V>, TableError> {
        self.get_mut(handle)?.insert(key, value)
    }

    pub fn search(&self, handle: TableHandle, key: &str) -> Result<Option<&V>, TableError> {
        self.get(handle)?.search(key)
    }

    pub fn delete(&mut self, handle: TableHandle, key: &str) -> Result<V, TableError> {
        self.get_mut(handle)?.delete(key)
    }

    /// Destroy the table behind `handle`. A second call reports `Destroyed`.
    pub fn destroy(&mut self, handle: TableHandle) -> Result<Teardown, TableError> {
        let table = self.tables.remove(handle).ok_or_else(|| stale(handle))?;
        Ok(table.destroy())
    }
}

fn stale(handle: TableHandle) -> TableError {
    warn!("operation on destroyed table {:?}", handle);
    TableError::Destroyed
}
