/*!
 * Memory Pool Tests
 * Allocation, release and reallocation through the public API
 */

use poolbank::{pool_storage, FragmentationState, MemoryError, PoolInfo, SlotAllocator};
use pretty_assertions::assert_eq;

#[test]
fn test_forward_scan_regression() {
    let mut storage = pool_storage!(10, 1);
    let mut pool = storage.pool(10, 1).unwrap();

    let mut a = Some(pool.allocate(4).unwrap());
    let b = pool.allocate(3).unwrap();
    assert_eq!(a, Some(0));
    assert_eq!(b, 4);

    pool.free(&mut a, 4);
    assert_eq!(a, None);
    assert_eq!(pool.free_slots(), 7);
    assert_eq!(pool.scan_cursor(), 0);
    assert_eq!(pool.check_fragmentation(), FragmentationState::Fragmented);

    let err = pool.allocate(5).unwrap_err();
    assert!(matches!(err, MemoryError::NoContiguousRun { requested: 5, .. }));
    assert_eq!(pool.free_slots(), 7);
    assert_eq!(pool.max_contiguous_free_space(), 4);
}

#[test]
fn test_over_allocation_keeps_free_count() {
    let mut storage = pool_storage!(3, 1);
    let mut pool = storage.pool(3, 1).unwrap();

    pool.allocate(2).unwrap();
    assert_eq!(
        pool.allocate(2).unwrap_err(),
        MemoryError::OutOfSlots {
            requested: 2,
            free: 1
        }
    );
    assert_eq!(pool.free_slots(), 1);
}

#[test]
fn test_alloc_free_round_trip_restores_state() {
    let mut storage = pool_storage!(16, 2);
    let mut pool = storage.pool(16, 2).unwrap();
    pool.allocate(3).unwrap();

    let before: Vec<bool> = (0..16).map(|slot| pool.is_occupied(slot)).collect();
    let free_before = pool.free_slots();

    let mut handle = Some(pool.allocate(5).unwrap());
    pool.free(&mut handle, 5);

    let after: Vec<bool> = (0..16).map(|slot| pool.is_occupied(slot)).collect();
    assert_eq!(after, before);
    assert_eq!(pool.free_slots(), free_before);
}

#[test]
fn test_invalid_frees_are_ignored() {
    let mut storage = pool_storage!(8, 4);
    let mut pool = storage.pool(8, 4).unwrap();
    let live = pool.allocate(2).unwrap();

    let mut outside = Some(64);
    pool.free(&mut outside, 1);
    assert_eq!(outside, Some(64));

    let mut misaligned = Some(live + 1);
    pool.free(&mut misaligned, 1);
    assert_eq!(misaligned, Some(live + 1));

    let mut overrunning = Some(28);
    pool.free(&mut overrunning, 2);
    assert_eq!(overrunning, Some(28));

    let mut empty = None;
    pool.free(&mut empty, 1);

    assert_eq!(pool.free_slots(), 6);
}

#[test]
fn test_double_free_is_a_no_op() {
    let mut storage = pool_storage!(4, 1);
    let mut pool = storage.pool(4, 1).unwrap();

    let mut handle = Some(pool.allocate(2).unwrap());
    let mut copy = handle;
    pool.free(&mut handle, 2);
    assert_eq!(pool.free_slots(), 4);

    // A stale copy of the handle only clears bits that are still set
    pool.free(&mut copy, 2);
    assert_eq!(pool.free_slots(), 4);
}

#[test]
fn test_allocate_zeroed_clears_stale_bytes() {
    let mut storage = pool_storage!(4, 4);
    let mut pool = storage.pool(4, 4).unwrap();

    let mut dirty = Some(pool.allocate(4).unwrap());
    pool.bytes_mut(0, 4).unwrap().fill(0xAB);
    pool.free(&mut dirty, 4);

    let address = pool.allocate_zeroed(3).unwrap();
    assert!(pool.bytes(address, 3).unwrap().iter().all(|&b| b == 0));
}

#[test]
fn test_reallocate_grows_and_copies() {
    let mut storage = pool_storage!(10, 2);
    let mut pool = storage.pool(10, 2).unwrap();

    let mut handle = Some(pool.allocate(2).unwrap());
    pool.bytes_mut(0, 2).unwrap().copy_from_slice(&[1, 2, 3, 4]);

    let new = pool.reallocate(&mut handle, 2, 4).unwrap();
    assert_eq!(handle, Some(new));
    assert_eq!(new, 4);
    assert_eq!(pool.bytes(new, 4).unwrap(), &[1, 2, 3, 4, 0, 0, 0, 0]);
    assert_eq!(pool.free_slots(), 6);
    assert!(!pool.is_occupied(0));
}

#[test]
fn test_reallocate_shrinks() {
    let mut storage = pool_storage!(8, 1);
    let mut pool = storage.pool(8, 1).unwrap();

    let mut handle = Some(pool.allocate(4).unwrap());
    pool.bytes_mut(0, 4).unwrap().copy_from_slice(&[9, 8, 7, 6]);

    let new = pool.reallocate(&mut handle, 4, 2).unwrap();
    assert_eq!(pool.bytes(new, 2).unwrap(), &[9, 8]);
    assert_eq!(pool.free_slots(), 6);
}

#[test]
fn test_reallocate_errors() {
    let mut storage = pool_storage!(4, 1);
    let mut pool = storage.pool(4, 1).unwrap();

    let mut handle = Some(pool.allocate(2).unwrap());
    assert_eq!(
        pool.reallocate(&mut handle, 2, 2).unwrap_err(),
        MemoryError::SameSizeReallocation(2)
    );

    let mut empty = None;
    assert_eq!(
        pool.reallocate(&mut empty, 1, 2).unwrap_err(),
        MemoryError::EmptyHandle
    );

    let mut foreign = Some(3);
    assert_eq!(
        pool.reallocate(&mut foreign, 2, 1).unwrap_err(),
        MemoryError::InvalidAddress(3)
    );
}

#[test]
fn test_failed_reallocate_leaves_region_intact() {
    let mut storage = pool_storage!(6, 1);
    let mut pool = storage.pool(6, 1).unwrap();

    let mut handle = Some(pool.allocate(3).unwrap());
    pool.bytes_mut(0, 3).unwrap().copy_from_slice(&[5, 6, 7]);

    assert!(pool.reallocate(&mut handle, 3, 4).is_err());
    assert_eq!(handle, Some(0));
    assert_eq!(pool.bytes(0, 3).unwrap(), &[5, 6, 7]);
    assert_eq!(pool.free_slots(), 3);
    assert!((0..3).all(|slot| pool.is_occupied(slot)));
}

#[test]
fn test_reset_releases_everything() {
    let mut storage = pool_storage!(5, 1);
    let mut pool = storage.pool(5, 1).unwrap();
    pool.allocate(5).unwrap();
    pool.reset();
    assert_eq!(pool.free_slots(), 5);
    assert_eq!(pool.scan_cursor(), 0);
    assert_eq!(pool.allocate(5).unwrap(), 0);
}

#[test]
fn test_stats_snapshot() {
    let mut storage = pool_storage!(10, 4);
    let mut pool = storage.pool(10, 4).unwrap();
    let mut first = Some(pool.allocate(2).unwrap());
    pool.allocate(6).unwrap();
    pool.free(&mut first, 2);

    let stats = pool.stats();
    assert_eq!(stats.used_slots, 6);
    assert_eq!(stats.free_slots, 4);
    assert_eq!(stats.largest_free_run, 2);
    assert_eq!(stats.fragmentation, FragmentationState::Fragmented);
    assert_eq!(stats.usage_percentage, 60.0);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["fragmentation"], "Fragmented");
}

fn fill<A: SlotAllocator + PoolInfo>(allocator: &mut A) -> usize {
    let mut allocations = 0;
    while allocator.allocate(1).is_ok() {
        allocations += 1;
    }
    allocations
}

#[test]
fn test_allocator_traits_drive_the_pool() {
    let mut storage = pool_storage!(7, 8);
    let mut pool = storage.pool(7, 8).unwrap();
    assert_eq!(fill(&mut pool), 7);
    assert_eq!(PoolInfo::used_slots(&pool), 7);
    assert_eq!(pool.pressure(), poolbank::MemoryPressure::Critical);
}
