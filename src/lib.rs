//! chained-table: a fixed-capacity hash table from string keys to values,
//! resolving collisions by separate chaining.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an O(1)-average string-keyed table whose memory footprint is
//!   fixed by its bucket count, with every failure returned to the caller.
//! - Layers:
//!   - `hash`: `BucketHasher` maps key bytes and a bucket count to an
//!     index. The default `Polynomial37` accumulates `v * 37 + byte`.
//!   - `chain`: entries live in a `SlotMap` arena; a chain is the path of
//!     `next` links starting at a bucket head. Insert prepends, delete
//!     relinks the predecessor before freeing the slot.
//!   - `ChainedTable<V, H>`: owns the bucket array and the arena and runs
//!     insert/search/delete through the two layers above.
//!   - `TableRegistry<V, H>`: optional generational handles for tables so
//!     that use after destroy is a checked `TableError::Destroyed`.
//!
//! Constraints
//! - Single-threaded, no internal synchronization. Wrap the table in a
//!   lock if it must be shared.
//! - The bucket count never changes; there is no rehashing.
//! - Keys are non-empty `&str`, copied into table-owned storage on first
//!   insert. Values are stored as given: pick `V = &'a T` to keep
//!   ownership with the caller, or `Rc<T>` for shared ownership.
//! - Iteration order is unspecified.
//!
//! Errors
//! - `AllocationFailure` when the bucket array, an entry slot or a key
//!   copy cannot be reserved; the table is unchanged.
//! - `KeyNotFound` from delete on a miss. Search reports a miss as `None`.
//! - `EmptyKey`, `ZeroBuckets`, `Destroyed` for precondition violations.
//!
//! Logging goes through the `log` facade; the crate never installs a
//! logger and never prints.

mod chain;
mod error;
pub mod hash;
pub mod registry;
pub mod table;
mod table_proptest;

// Public surface
pub use error::TableError;
pub use hash::{bucket_index, BucketHasher, Polynomial37};
pub use registry::{TableHandle, TableRegistry};
pub use table::{ChainedTable, Teardown};
