//! ChainedTable: fixed bucket array of chain heads over an entry arena.

use crate::chain::{self, Arena, Chain, Entry, EntryKey};
use crate::error::TableError;
use crate::hash::{BucketHasher, Polynomial37};
use core::num::NonZeroUsize;
use log::{debug, trace, warn};
use slotmap::SlotMap;

/// A string-keyed hash table with separate chaining and a bucket count
/// fixed at construction.
///
/// Values are stored by value. To hold caller-owned data without moving
/// it in, use a reference type such as `&'a T` for `V`: the table then
/// never outlives the values it refers to, and dropping an entry never
/// frees the referent. `Rc<T>` gives shared ownership instead.
///
/// The table never resizes. [`load_factor`](Self::load_factor) is reported
/// for diagnostics only.
#[derive(Debug)]
pub struct ChainedTable<V, H = Polynomial37> {
    hasher: H,
    size: NonZeroUsize,
    buckets: Box<[Option<EntryKey>]>,
    slots: Arena<V>,
}

/// What [`ChainedTable::destroy`] released.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Teardown {
    /// Entries (with their key copies) released.
    pub entries: usize,
    /// Length of the bucket array that was freed.
    pub buckets: usize,
}

impl<V> ChainedTable<V> {
    /// Create a table with `bucket_count` empty buckets and the default hasher.
    pub fn new(bucket_count: usize) -> Result<Self, TableError> {
        Self::with_hasher(bucket_count, Polynomial37)
    }
}

/// Iterator over all entries. Order is unspecified.
pub struct Iter<'a, V> {
    it: slotmap::basic::Iter<'a, EntryKey, Entry<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&*e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<V, H> ChainedTable<V, H>
where
    H: BucketHasher,
{
    pub fn with_hasher(bucket_count: usize, hasher: H) -> Result<Self, TableError> {
        let size = NonZeroUsize::new(bucket_count).ok_or(TableError::ZeroBuckets)?;
        let mut heads = Vec::new();
        if heads.try_reserve_exact(size.get()).is_err() {
            warn!("could not reserve {} buckets", size);
            return Err(TableError::AllocationFailure {
                what: "bucket array",
            });
        }
        heads.resize(size.get(), None);
        debug!("created table with {} buckets", size);
        Ok(Self {
            hasher,
            size,
            buckets: heads.into_boxed_slice(),
            slots: SlotMap::with_key(),
        })
    }

    // Out-of-range indices from a custom hasher are folded back into range.
    fn index_of(&self, key: &str) -> usize {
        self.hasher.bucket_index(key.as_bytes(), self.size) % self.size.get()
    }

    fn check_key(key: &str) -> Result<(), TableError> {
        if key.is_empty() {
            return Err(TableError::EmptyKey);
        }
        Ok(())
    }

    fn locate(&self, key: &str) -> (usize, Option<chain::Found>) {
        let index = self.index_of(key);
        let found = chain::find(&self.slots, self.buckets[index], key);
        (index, found)
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.size.get()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.size.get() as f64
    }

    /// Length of the chain in bucket `index`, or `None` if out of range.
    pub fn chain_len(&self, index: usize) -> Option<usize> {
        let head = *self.buckets.get(index)?;
        Some(Chain::new(&self.slots, head).count())
    }

    /// Insert or overwrite. Returns the previous value when `key` was
    /// already present; the entry count is unchanged in that case.
    ///
    /// A new key is copied into table-owned storage and prepended to its
    /// chain. If the key copy or the entry slot cannot be allocated the
    /// table is not touched.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>, TableError> {
        Self::check_key(key)?;
        let (index, found) = self.locate(key);
        if let Some(f) = found {
            // Found keys are always live in the arena.
            if let Some(e) = self.slots.get_mut(f.at) {
                trace!("overwrite {:?} in bucket {}", key, index);
                return Ok(Some(core::mem::replace(&mut e.value, value)));
            }
        }

        let owned = chain::copy_key(key).inspect_err(|_| {
            warn!("could not copy key of {} bytes", key.len());
        })?;
        self.slots.try_reserve(1).map_err(|_| {
            warn!("could not reserve an entry slot ({} live)", self.slots.len());
            TableError::AllocationFailure { what: "entry" }
        })?;
        chain::push_front(&mut self.slots, &mut self.buckets[index], owned, value);
        trace!("new entry {:?} in bucket {}", key, index);
        Ok(None)
    }

    /// Shared reference to the value stored under `key`.
    pub fn search(&self, key: &str) -> Result<Option<&V>, TableError> {
        Self::check_key(key)?;
        let (_, found) = self.locate(key);
        Ok(found.and_then(|f| self.slots.get(f.at)).map(|e| &e.value))
    }

    /// Mutable access to the value stored under `key`, in place.
    pub fn get_mut(&mut self, key: &str) -> Result<Option<&mut V>, TableError> {
        Self::check_key(key)?;
        let Some(f) = self.locate(key).1 else {
            return Ok(None);
        };
        Ok(self.slots.get_mut(f.at).map(|e| &mut e.value))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        !key.is_empty() && self.locate(key).1.is_some()
    }

    /// Remove `key`, returning its value. A miss leaves the table unchanged
    /// and yields [`TableError::KeyNotFound`].
    pub fn delete(&mut self, key: &str) -> Result<V, TableError> {
        Self::check_key(key)?;
        let (index, found) = self.locate(key);
        let Some(f) = found else {
            trace!("delete miss {:?} in bucket {}", key, index);
            return Err(TableError::KeyNotFound);
        };
        let entry = chain::unlink(&mut self.slots, &mut self.buckets[index], f)
            .ok_or(TableError::KeyNotFound)?;
        trace!("deleted {:?} from bucket {}", key, index);
        Ok(entry.value)
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    /// Release every entry, key copy and the bucket array.
    ///
    /// Consumes the table, so no operation can follow on the same value.
    pub fn destroy(mut self) -> Teardown {
        let mut entries = 0;
        for head in self.buckets.iter_mut() {
            let mut cursor = head.take();
            while let Some(k) = cursor {
                cursor = self.slots.remove(k).and_then(|e| e.next);
                entries += 1;
            }
        }
        debug_assert!(self.slots.is_empty(), "unreachable entries left in arena");
        let teardown = Teardown {
            entries,
            buckets: self.size.get(),
        };
        debug!(
            "destroyed table: {} entries, {} buckets released",
            teardown.entries, teardown.buckets
        );
        teardown
    }

    /// Walk every chain and check the structural invariants.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        for (i, &head) in self.buckets.iter().enumerate() {
            for (_, e) in Chain::new(&self.slots, head) {
                assert_eq!(self.index_of(&e.key), i, "entry in wrong bucket");
                assert!(seen.insert(e.key.clone()), "duplicate key {:?}", e.key);
            }
        }
        assert_eq!(seen.len(), self.len(), "count differs from reachable entries");
    }
}

impl<'a, V, H> IntoIterator for &'a ChainedTable<V, H>
where
    H: BucketHasher,
{
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
