//! Entry and chain primitives.
//!
//! Entries live in a generational arena; a chain is the sequence reached
//! by following `next` links from a bucket head. Links are arena keys, not
//! pointers, so an unlinked entry can never be reached again.

use crate::error::TableError;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Arena key naming one entry.
    pub(crate) struct EntryKey;
}

#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: Box<str>,
    pub(crate) value: V,
    pub(crate) next: Option<EntryKey>,
}

pub(crate) type Arena<V> = SlotMap<EntryKey, Entry<V>>;

/// Copy `key` into storage owned by the table, reporting allocation failure.
pub(crate) fn copy_key(key: &str) -> Result<Box<str>, TableError> {
    let mut owned = String::new();
    owned
        .try_reserve_exact(key.len())
        .map_err(|_| TableError::AllocationFailure { what: "key copy" })?;
    owned.push_str(key);
    Ok(owned.into_boxed_str())
}

/// Walks one chain from its head.
pub(crate) struct Chain<'a, V> {
    arena: &'a Arena<V>,
    cursor: Option<EntryKey>,
}

impl<'a, V> Chain<'a, V> {
    pub(crate) fn new(arena: &'a Arena<V>, head: Option<EntryKey>) -> Self {
        Self {
            arena,
            cursor: head,
        }
    }
}

impl<'a, V> Iterator for Chain<'a, V> {
    type Item = (EntryKey, &'a Entry<V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cursor?;
        let e = self.arena.get(k)?;
        self.cursor = e.next;
        Some((k, e))
    }
}

/// Position of a matching entry within its chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Found {
    pub(crate) prev: Option<EntryKey>,
    pub(crate) at: EntryKey,
}

pub(crate) fn find<V>(arena: &Arena<V>, head: Option<EntryKey>, key: &str) -> Option<Found> {
    let mut prev = None;
    for (k, e) in Chain::new(arena, head) {
        if &*e.key == key {
            return Some(Found { prev, at: k });
        }
        prev = Some(k);
    }
    None
}

/// Prepend a new entry; the chain head becomes the new entry.
pub(crate) fn push_front<V>(
    arena: &mut Arena<V>,
    head: &mut Option<EntryKey>,
    key: Box<str>,
    value: V,
) -> EntryKey {
    let k = arena.insert(Entry {
        key,
        value,
        next: *head,
    });
    *head = Some(k);
    k
}

/// Unlink the entry at `found` and release it from the arena.
///
/// The predecessor (or the head) is relinked before the slot is freed.
pub(crate) fn unlink<V>(
    arena: &mut Arena<V>,
    head: &mut Option<EntryKey>,
    found: Found,
) -> Option<Entry<V>> {
    let next = arena.get(found.at)?.next;
    match found.prev {
        None => *head = next,
        Some(p) => arena.get_mut(p)?.next = next,
    }
    arena.remove(found.at)
}
