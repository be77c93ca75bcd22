// Allocation-tracking harness: every byte the table allocates on this
// thread must be released by destroy. The counters are thread-local so
// the test runner's own threads do not disturb the tally.
use chained_table::{ChainedTable, TableRegistry};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

struct Tracking;

thread_local! {
    static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
    static LIVE_BLOCKS: Cell<isize> = const { Cell::new(0) };
}

fn record(bytes: isize, blocks: isize) {
    let _ = LIVE_BYTES.try_with(|c| c.set(c.get() + bytes));
    let _ = LIVE_BLOCKS.try_with(|c| c.set(c.get() + blocks));
}

unsafe impl GlobalAlloc for Tracking {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let p = System.alloc(layout);
        if !p.is_null() {
            record(layout.size() as isize, 1);
        }
        p
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        record(-(layout.size() as isize), -1);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let p = System.realloc(ptr, layout, new_size);
        if !p.is_null() {
            record(new_size as isize - layout.size() as isize, 0);
        }
        p
    }
}

#[global_allocator]
static GLOBAL: Tracking = Tracking;

fn live() -> (isize, isize) {
    (LIVE_BYTES.with(Cell::get), LIVE_BLOCKS.with(Cell::get))
}

// Keys are built before the baseline so only table allocations are counted.
fn keys() -> Vec<String> {
    (0..500).map(|i| format!("key-{i:04}")).collect()
}

#[test]
fn destroy_releases_everything() {
    let keys = keys();
    let baseline = live();

    let mut table: ChainedTable<&str> = ChainedTable::new(10).unwrap();
    assert!(live().1 > baseline.1, "bucket array should be allocated");
    for k in &keys {
        table.insert(k, "v").unwrap();
    }
    for k in keys.iter().step_by(2) {
        table.delete(k).unwrap();
    }
    assert!(table.delete("missing").is_err());
    table.insert("key-0001", "overwritten").unwrap();

    let report = table.destroy();
    assert_eq!(report.entries, 250);
    assert_eq!(live(), baseline);
}

#[test]
fn scenario_leaves_nothing_reachable() {
    let baseline = live();
    let mut table: ChainedTable<&str> = ChainedTable::new(10).unwrap();
    table.insert("name", "Alice").unwrap();
    table.insert("age", "30").unwrap();
    table.insert("city", "New York").unwrap();
    table.delete("city").unwrap();
    table.destroy();
    assert_eq!(live(), baseline);
}

#[test]
fn registry_destroy_releases_table() {
    let mut reg: TableRegistry<u8> = TableRegistry::new();
    let warm = reg.create(1).unwrap();
    reg.destroy(warm).unwrap();
    // The registry keeps its own slot storage; only the table is measured.
    let baseline = live();

    let h = reg.create(64).unwrap();
    for i in 0..32u8 {
        reg.insert(h, &format!("k{i}"), i).unwrap();
    }
    reg.destroy(h).unwrap();
    assert_eq!(live(), baseline);
}
