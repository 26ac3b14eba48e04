/*!
 * Memory Traits
 * Allocator abstractions shared by pools and their consumers
 */

use super::types::*;
use crate::core::types::{Address, Size};

/// Fixed-slot allocator interface
pub trait SlotAllocator {
    /// Bytes per slot
    fn element_size(&self) -> Size;

    /// Allocate `count` contiguous slots
    fn allocate(&mut self, count: Size) -> MemoryResult<Address>;

    /// Allocate `count` contiguous slots and zero them
    fn allocate_zeroed(&mut self, count: Size) -> MemoryResult<Address>;

    /// Release `count` slots starting at `*address`, clearing the handle
    fn free(&mut self, address: &mut Option<Address>, count: Size);

    /// Move an allocation to a fresh region of `new_count` slots
    fn reallocate(
        &mut self,
        address: &mut Option<Address>,
        old_count: Size,
        new_count: Size,
    ) -> MemoryResult<Address>;

    /// Borrow the bytes of `count` slots starting at `address`
    fn bytes(&self, address: Address, count: Size) -> Option<&[u8]>;

    /// Mutably borrow the bytes of `count` slots starting at `address`
    fn bytes_mut(&mut self, address: Address, count: Size) -> Option<&mut [u8]>;
}

/// Occupancy introspection
pub trait PoolInfo {
    /// Total slot count
    fn capacity(&self) -> Size;

    /// Currently free slots
    fn free_slots(&self) -> Size;

    fn check_fragmentation(&self) -> FragmentationState;

    /// Longest run of free slots
    fn max_contiguous_free_space(&self) -> Size;

    fn used_slots(&self) -> Size {
        self.capacity() - self.free_slots()
    }

    fn pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.used_slots() as f64 / self.capacity() as f64)
    }
}
