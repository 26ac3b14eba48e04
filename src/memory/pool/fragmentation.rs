/*!
 * Pool Fragmentation
 * Occupancy layout inspection
 */

use super::MemoryPool;
use crate::core::types::Size;
use crate::memory::types::FragmentationState;

impl MemoryPool<'_> {
    /// Classify the occupancy layout
    ///
    /// A pool is unfragmented when nothing is allocated or when the allocated
    /// slots form a single run starting at slot 0.
    pub fn check_fragmentation(&self) -> FragmentationState {
        let used = self.used_slots();
        if used == 0 || (0..used).all(|slot| self.in_use.read(slot)) {
            FragmentationState::Unfragmented
        } else {
            FragmentationState::Fragmented
        }
    }

    /// Longest run of free slots anywhere in the pool
    pub fn max_contiguous_free_space(&self) -> Size {
        if self.check_fragmentation() == FragmentationState::Unfragmented {
            return self.free_slots;
        }

        let mut longest = 0;
        let mut current = 0;
        for slot in 0..self.capacity {
            if self.in_use.read(slot) {
                current = 0;
            } else {
                current += 1;
                longest = longest.max(current);
            }
        }
        longest
    }
}
