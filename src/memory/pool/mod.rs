/*!
 * Memory Pool
 *
 * Fixed-block allocator over a caller-provided backing array.
 *
 * ## Layout
 *
 * - **Backing store**: `capacity * element_size` bytes, carved into slots
 * - **Occupancy bitmap**: one bit per slot, set while the slot is allocated
 * - **Scan cursor**: where the next allocation scan starts
 *
 * ## Allocation
 *
 * Allocations are runs of contiguous slots found by a forward scan from the
 * cursor. The scan never wraps back to slot 0. The cursor only moves forward
 * when a run is found right at it and is rewound by frees below it, so it
 * always rests on the lowest free slot.
 *
 * Handles are byte offsets into the backing store. `free` and `reallocate`
 * recover the slot range from `(address, element_size, count)`; no per-block
 * metadata is stored.
 */

mod allocator;
mod fragmentation;
mod storage;

pub use storage::PoolStorage;

use super::bitvector::BitVector;
use super::traits::{PoolInfo, SlotAllocator};
use super::types::{FragmentationState, MemoryError, MemoryResult, PoolStats};
use crate::core::types::{Address, Size};
use tracing::debug;

/// Fixed-capacity slot pool
#[derive(Debug)]
pub struct MemoryPool<'a> {
    data: &'a mut [u8],
    in_use: BitVector<'a>,
    capacity: Size,
    element_size: Size,
    free_slots: Size,
    scan_cursor: Size,
}

impl<'a> MemoryPool<'a> {
    /// Initialize a pool of `capacity` slots of `element_size` bytes
    ///
    /// `data` must hold at least `capacity * element_size` bytes and `cells` at
    /// least `required_cells(capacity)` cells. The bitmap is zeroed; the
    /// backing bytes are left as they are.
    pub fn new(
        capacity: Size,
        element_size: Size,
        data: &'a mut [u8],
        cells: &'a mut [u8],
    ) -> MemoryResult<Self> {
        if capacity == 0 {
            return Err(MemoryError::ZeroCapacity);
        }
        if element_size == 0 {
            return Err(MemoryError::ZeroElementSize);
        }

        let required = capacity.checked_mul(element_size).ok_or_else(|| {
            MemoryError::InvalidConfig(format!(
                "{} slots of {} bytes overflow the address space",
                capacity, element_size
            ))
        })?;
        if data.len() < required {
            return Err(MemoryError::BackingTooSmall {
                required,
                provided: data.len(),
            });
        }

        let (data, _) = data.split_at_mut(required);
        let mut in_use = BitVector::new(cells, capacity)?;
        in_use.clear_all();

        debug!(
            capacity,
            element_size,
            bytes = required,
            "Memory pool initialized"
        );

        Ok(Self {
            data,
            in_use,
            capacity,
            element_size,
            free_slots: capacity,
            scan_cursor: 0,
        })
    }

    /// Release every slot and rewind the cursor
    pub fn reset(&mut self) {
        self.in_use.clear_all();
        self.free_slots = self.capacity;
        self.scan_cursor = 0;
        debug!(capacity = self.capacity, "Memory pool reset");
    }

    #[inline]
    pub fn capacity(&self) -> Size {
        self.capacity
    }

    #[inline]
    pub fn element_size(&self) -> Size {
        self.element_size
    }

    #[inline]
    pub fn free_slots(&self) -> Size {
        self.free_slots
    }

    #[inline]
    pub fn used_slots(&self) -> Size {
        self.capacity - self.free_slots
    }

    #[inline]
    pub fn scan_cursor(&self) -> Size {
        self.scan_cursor
    }

    /// Whether `slot` is currently allocated
    pub fn is_occupied(&self, slot: Size) -> bool {
        slot < self.capacity && self.in_use.read(slot)
    }

    /// Whether `address` points inside the backing store
    pub fn contains(&self, address: Address) -> bool {
        address < self.data.len()
    }

    /// Slot index of `address` if `count` slots from there stay inside the pool
    pub fn slot_of(&self, address: Address, count: Size) -> Option<Size> {
        if address % self.element_size != 0 {
            return None;
        }
        let start = address / self.element_size;
        let end = start.checked_add(count)?;
        if start >= self.capacity || end > self.capacity {
            return None;
        }
        Some(start)
    }

    /// Borrow the bytes of `count` slots starting at `address`
    pub fn bytes(&self, address: Address, count: Size) -> Option<&[u8]> {
        self.slot_of(address, count)?;
        let end = address + count * self.element_size;
        Some(&self.data[address..end])
    }

    /// Mutably borrow the bytes of `count` slots starting at `address`
    pub fn bytes_mut(&mut self, address: Address, count: Size) -> Option<&mut [u8]> {
        self.slot_of(address, count)?;
        let end = address + count * self.element_size;
        Some(&mut self.data[address..end])
    }

    /// Snapshot of occupancy and fragmentation
    pub fn stats(&self) -> PoolStats {
        let used = self.used_slots();
        PoolStats {
            capacity: self.capacity,
            element_size: self.element_size,
            used_slots: used,
            free_slots: self.free_slots,
            largest_free_run: self.max_contiguous_free_space(),
            fragmentation: self.check_fragmentation(),
            usage_percentage: (used as f64 / self.capacity as f64) * 100.0,
        }
    }
}

// Implement trait interfaces
impl SlotAllocator for MemoryPool<'_> {
    fn element_size(&self) -> Size {
        MemoryPool::element_size(self)
    }

    fn allocate(&mut self, count: Size) -> MemoryResult<Address> {
        MemoryPool::allocate(self, count)
    }

    fn allocate_zeroed(&mut self, count: Size) -> MemoryResult<Address> {
        MemoryPool::allocate_zeroed(self, count)
    }

    fn free(&mut self, address: &mut Option<Address>, count: Size) {
        MemoryPool::free(self, address, count)
    }

    fn reallocate(
        &mut self,
        address: &mut Option<Address>,
        old_count: Size,
        new_count: Size,
    ) -> MemoryResult<Address> {
        MemoryPool::reallocate(self, address, old_count, new_count)
    }

    fn bytes(&self, address: Address, count: Size) -> Option<&[u8]> {
        MemoryPool::bytes(self, address, count)
    }

    fn bytes_mut(&mut self, address: Address, count: Size) -> Option<&mut [u8]> {
        MemoryPool::bytes_mut(self, address, count)
    }
}

impl PoolInfo for MemoryPool<'_> {
    fn capacity(&self) -> Size {
        MemoryPool::capacity(self)
    }

    fn free_slots(&self) -> Size {
        MemoryPool::free_slots(self)
    }

    fn check_fragmentation(&self) -> FragmentationState {
        MemoryPool::check_fragmentation(self)
    }

    fn max_contiguous_free_space(&self) -> Size {
        MemoryPool::max_contiguous_free_space(self)
    }
}
