mod common;

use chained_table::{TableError, TableRegistry};
use common::initialize_logger;
use proptest::prelude::*;

#[test]
fn destroyed_handle_is_rejected() {
    initialize_logger();
    let mut reg: TableRegistry<&str> = TableRegistry::new();
    let h = reg.create(10).unwrap();
    reg.insert(h, "name", "Alice").unwrap();
    let report = reg.destroy(h).unwrap();
    assert_eq!(report.entries, 1);

    assert_eq!(reg.insert(h, "name", "Bob"), Err(TableError::Destroyed));
    assert_eq!(reg.search(h, "name"), Err(TableError::Destroyed));
    assert_eq!(reg.delete(h, "name"), Err(TableError::Destroyed));
    assert_eq!(reg.destroy(h), Err(TableError::Destroyed));
    assert!(reg.get(h).is_err());
}

// A stale handle must not alias a table created in the reused slot.
#[test]
fn stale_handle_does_not_alias_new_table() {
    initialize_logger();
    let mut reg: TableRegistry<i32> = TableRegistry::new();
    let h1 = reg.create(4).unwrap();
    reg.destroy(h1).unwrap();
    let h2 = reg.create(4).unwrap();
    assert_ne!(h1, h2);
    reg.insert(h2, "k", 1).unwrap();
    assert_eq!(reg.search(h1, "k"), Err(TableError::Destroyed));
    assert_eq!(reg.search(h2, "k"), Ok(Some(&1)));
}

#[test]
fn tables_are_independent() {
    let mut reg: TableRegistry<i32> = TableRegistry::new();
    let a = reg.create(2).unwrap();
    let b = reg.create(8).unwrap();
    reg.insert(a, "k", 1).unwrap();
    reg.insert(b, "k", 2).unwrap();
    assert_eq!(reg.delete(a, "k"), Ok(1));
    assert_eq!(reg.search(b, "k"), Ok(Some(&2)));
    assert_eq!(reg.get(a).unwrap().bucket_count(), 2);
    assert_eq!(reg.get_mut(b).unwrap().bucket_count(), 8);
    assert_eq!(reg.len(), 2);
}

// Property: a handle resolves iff its table has not been destroyed.
proptest! {
    #[test]
    fn prop_handle_liveness(ops in proptest::collection::vec((0u8..=2u8, 0usize..8usize), 1..80)) {
        let mut reg: TableRegistry<usize> = TableRegistry::new();
        let mut live = Vec::new();
        let mut dead = Vec::new();

        for (op, raw) in ops {
            match op {
                0 => live.push(reg.create(raw + 1).unwrap()),
                1 => {
                    if !live.is_empty() {
                        let h = live.swap_remove(raw % live.len());
                        prop_assert!(reg.destroy(h).is_ok());
                        dead.push(h);
                    }
                }
                2 => {
                    if !live.is_empty() {
                        let h = live[raw % live.len()];
                        reg.insert(h, "k", raw).unwrap();
                        prop_assert_eq!(reg.search(h, "k"), Ok(Some(&raw)));
                    }
                }
                _ => unreachable!(),
            }

            for &h in &dead {
                prop_assert_eq!(reg.destroy(h), Err(TableError::Destroyed));
            }
            for &h in &live {
                prop_assert!(reg.contains(h));
            }
            prop_assert_eq!(reg.len(), live.len());
        }
    }
}
