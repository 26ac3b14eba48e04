/*!
 * Pool Property Tests
 * Invariants checked over random allocate/free sequences
 */

use poolbank::{pool_storage, MemoryError, MemoryPool};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

const CAPACITY: usize = 32;
const ELEMENT: usize = 2;

#[derive(Debug, Clone)]
enum Op {
    Allocate(usize),
    Free(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1usize..6).prop_map(Op::Allocate),
        any::<usize>().prop_map(Op::Free),
    ]
}

/// Lowest slot starting `count` free slots, scanning from slot 0
fn first_fit(pool: &MemoryPool<'_>, count: usize) -> Option<usize> {
    let mut run = 0;
    for slot in 0..pool.capacity() {
        if pool.is_occupied(slot) {
            run = 0;
        } else {
            run += 1;
            if run == count {
                return Some(slot + 1 - count);
            }
        }
    }
    None
}

fn check_invariants(pool: &MemoryPool<'_>, live: &[(usize, usize)]) -> Result<(), TestCaseError> {
    let occupied = (0..CAPACITY).filter(|&slot| pool.is_occupied(slot)).count();
    prop_assert_eq!(pool.free_slots() + occupied, CAPACITY);

    let mut owner = [false; CAPACITY];
    for &(start, count) in live {
        for slot in start..start + count {
            prop_assert!(!owner[slot], "slot {} handed out twice", slot);
            prop_assert!(pool.is_occupied(slot));
            owner[slot] = true;
        }
    }
    prop_assert_eq!(owner.iter().filter(|&&o| o).count(), occupied);

    let lowest_free = (0..CAPACITY)
        .find(|&slot| !pool.is_occupied(slot))
        .unwrap_or(CAPACITY);
    prop_assert_eq!(pool.scan_cursor(), lowest_free);
    Ok(())
}

proptest! {
    #[test]
    fn prop_pool_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut storage = pool_storage!(CAPACITY, ELEMENT);
        let mut pool = storage.pool(CAPACITY, ELEMENT).unwrap();
        let mut live: Vec<(usize, usize)> = Vec::new();

        for op in ops {
            match op {
                Op::Allocate(count) => {
                    let expected = first_fit(&pool, count);
                    match pool.allocate(count) {
                        Ok(address) => {
                            prop_assert_eq!(Some(address / ELEMENT), expected);
                            live.push((address / ELEMENT, count));
                        }
                        Err(MemoryError::OutOfSlots { .. }) => {
                            prop_assert!(pool.free_slots() < count);
                        }
                        Err(MemoryError::NoContiguousRun { .. }) => {
                            prop_assert_eq!(expected, None);
                            prop_assert!(pool.max_contiguous_free_space() < count);
                        }
                        Err(other) => {
                            prop_assert!(false, "unexpected error: {}", other);
                        }
                    }
                }
                Op::Free(pick) => {
                    if live.is_empty() {
                        continue;
                    }
                    let (start, count) = live.swap_remove(pick % live.len());
                    let mut handle = Some(start * ELEMENT);
                    pool.free(&mut handle, count);
                    prop_assert_eq!(handle, None);
                }
            }
            check_invariants(&pool, &live)?;
        }
    }

    #[test]
    fn prop_alloc_free_round_trip(prefix in prop::collection::vec(1usize..5, 0..8), count in 1usize..8) {
        let mut storage = pool_storage!(CAPACITY, ELEMENT);
        let mut pool = storage.pool(CAPACITY, ELEMENT).unwrap();
        for n in prefix {
            let _ = pool.allocate(n);
        }

        let before: Vec<bool> = (0..CAPACITY).map(|slot| pool.is_occupied(slot)).collect();
        let free_before = pool.free_slots();
        let cursor_before = pool.scan_cursor();

        if let Ok(address) = pool.allocate(count) {
            let mut handle = Some(address);
            pool.free(&mut handle, count);
        }

        let after: Vec<bool> = (0..CAPACITY).map(|slot| pool.is_occupied(slot)).collect();
        prop_assert_eq!(after, before);
        prop_assert_eq!(pool.free_slots(), free_before);
        prop_assert_eq!(pool.scan_cursor(), cursor_before);
    }

    #[test]
    fn prop_allocate_zeroed_is_zero(dirt in any::<u8>(), count in 1usize..CAPACITY) {
        let mut storage = pool_storage!(CAPACITY, ELEMENT);
        let mut pool = storage.pool(CAPACITY, ELEMENT).unwrap();
        let mut everything = Some(pool.allocate(CAPACITY).unwrap());
        pool.bytes_mut(0, CAPACITY).unwrap().fill(dirt);
        pool.free(&mut everything, CAPACITY);

        let address = pool.allocate_zeroed(count).unwrap();
        prop_assert!(pool.bytes(address, count).unwrap().iter().all(|&b| b == 0));
    }
}
