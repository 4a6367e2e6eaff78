use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use pagepool::{BufferPool, MemoryDisk, PageId, StorageManager};

fn pool_of(num_frames: usize) -> BufferPool {
    let storage = Arc::new(StorageManager::new(Box::new(MemoryDisk::new())));
    BufferPool::new(storage, num_frames).unwrap()
}

/// Fetch of an already resident page, the pure bookkeeping cost.
fn pin_unpin_hit(c: &mut Criterion) {
    let pool = pool_of(8);
    drop(pool.fetch_page(0).unwrap());

    c.bench_function("pin_unpin_hit", |b| {
        b.iter(|| {
            let handle = pool.fetch_page(0).unwrap();
            drop(handle);
        })
    });
}

/// Every fetch misses and evicts a clean page.
fn cold_miss(c: &mut Criterion) {
    let pool = pool_of(8);
    let mut page_id: PageId = 0;

    c.bench_function("cold_miss", |b| {
        b.iter(|| {
            let handle = pool.fetch_page(page_id).unwrap();
            drop(handle);
            page_id += 1;
        })
    });
}

/// Every fetch misses and the victim must be flushed first.
fn dirty_eviction(c: &mut Criterion) {
    let pool = pool_of(8);
    let mut page_id: PageId = 0;

    c.bench_function("dirty_eviction", |b| {
        b.iter(|| {
            let handle = pool.fetch_page(page_id).unwrap();
            handle.write().set_int(0, page_id as i32);
            handle.mark_dirty();
            drop(handle);
            page_id += 1;
        })
    });
}

/// Cycle through a working set that fits the pool, then one that does not.
fn working_set_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("working_set_scan");

    for (name, num_frames, working_set) in [("fits_pool", 32, 16u64), ("thrashes_pool", 32, 64u64)]
    {
        let pool = pool_of(num_frames);
        let mut next: PageId = 0;
        group.bench_function(name, |b| {
            b.iter(|| {
                let handle = pool.fetch_page(next % working_set).unwrap();
                drop(handle);
                next += 1;
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    pin_unpin_hit,
    cold_miss,
    dirty_eviction,
    working_set_scan
);
criterion_main!(benches);
