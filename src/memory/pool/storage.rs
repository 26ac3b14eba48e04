/*!
 * Pool Storage
 * Statically sized backing arrays for a pool
 */

use super::MemoryPool;
use crate::core::types::Size;
use crate::memory::types::MemoryResult;

/// Inline backing store and occupancy cells for one pool
///
/// Size it with [`pool_storage!`](crate::pool_storage) to get exactly
/// `capacity * element_size` data bytes and `required_cells(capacity)` cells.
#[derive(Debug)]
pub struct PoolStorage<const BYTES: usize, const CELLS: usize> {
    data: [u8; BYTES],
    cells: [u8; CELLS],
}

impl<const BYTES: usize, const CELLS: usize> PoolStorage<BYTES, CELLS> {
    pub const fn new() -> Self {
        Self {
            data: [0; BYTES],
            cells: [0; CELLS],
        }
    }

    /// Borrow the storage as a pool of `capacity` slots of `element_size` bytes
    pub fn pool(&mut self, capacity: Size, element_size: Size) -> MemoryResult<MemoryPool<'_>> {
        MemoryPool::new(capacity, element_size, &mut self.data, &mut self.cells)
    }

    /// Split into the raw data and cell arrays
    pub fn parts(&mut self) -> (&mut [u8], &mut [u8]) {
        (&mut self.data, &mut self.cells)
    }
}

impl<const BYTES: usize, const CELLS: usize> Default for PoolStorage<BYTES, CELLS> {
    fn default() -> Self {
        Self::new()
    }
}

/// Declare a [`PoolStorage`] sized for `capacity` slots of `element_size` bytes
///
/// ```
/// let mut storage = poolbank::pool_storage!(16, 4);
/// let pool = storage.pool(16, 4).unwrap();
/// assert_eq!(pool.free_slots(), 16);
/// ```
#[macro_export]
macro_rules! pool_storage {
    ($capacity:expr, $element_size:expr) => {
        $crate::memory::PoolStorage::<
            { ($capacity) * ($element_size) },
            { $crate::memory::required_cells($capacity) },
        >::new()
    };
}
