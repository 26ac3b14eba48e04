/*!
 * Pool Allocator Implementation
 * Allocation, deallocation and reallocation logic
 */

use super::MemoryPool;
use crate::core::limits::PRESSURE_WARNING_RATIO;
use crate::core::types::{Address, Size};
use crate::memory::types::{MemoryError, MemoryPressure, MemoryResult};
use tracing::{debug, warn};

/// Outcome of a successful run search
struct Run {
    start: Size,
    /// The scan stepped over at least one occupied slot before finding the run
    crossed_occupied: bool,
}

impl MemoryPool<'_> {
    /// Allocate `count` contiguous slots
    ///
    /// Fails fast with `OutOfSlots` when fewer than `count` slots are free in
    /// total, and with `NoContiguousRun` when the forward scan reaches the end
    /// of the pool first.
    pub fn allocate(&mut self, count: Size) -> MemoryResult<Address> {
        if count == 0 {
            return Err(MemoryError::InvalidCount);
        }
        if self.free_slots < count {
            warn!(
                requested = count,
                free = self.free_slots,
                capacity = self.capacity,
                "Pool allocation rejected: not enough free slots"
            );
            return Err(MemoryError::OutOfSlots {
                requested: count,
                free: self.free_slots,
            });
        }

        let run = match self.find_run(count) {
            Some(run) => run,
            None => {
                warn!(
                    requested = count,
                    free = self.free_slots,
                    cursor = self.scan_cursor,
                    "Pool allocation failed: no contiguous run reachable from cursor"
                );
                return Err(MemoryError::NoContiguousRun {
                    requested: count,
                    free: self.free_slots,
                    cursor: self.scan_cursor,
                });
            }
        };

        let end = run.start + count;
        for slot in run.start..end {
            self.in_use.set(slot);
        }

        // Only a run found straight at the cursor moves it; a run found past
        // an occupied slot leaves the smaller gap in front for later requests.
        if !run.crossed_occupied {
            let mut next = end;
            while next < self.capacity && self.in_use.read(next) {
                next += 1;
            }
            self.scan_cursor = next;
        }
        self.free_slots -= count;

        let address = run.start * self.element_size;
        debug!(
            address,
            slot = run.start,
            count,
            free = self.free_slots,
            cursor = self.scan_cursor,
            "Allocated pool slots"
        );
        self.check_pressure();

        Ok(address)
    }

    /// Allocate `count` contiguous slots and zero their bytes
    pub fn allocate_zeroed(&mut self, count: Size) -> MemoryResult<Address> {
        let address = self.allocate(count)?;
        let end = address + count * self.element_size;
        self.data[address..end].fill(0);
        Ok(address)
    }

    /// Release `count` slots starting at `*address`
    ///
    /// Empty handles and addresses whose extent leaves the pool are ignored.
    /// On success the handle is cleared, so freeing it again is a no-op.
    pub fn free(&mut self, address: &mut Option<Address>, count: Size) {
        let Some(addr) = *address else {
            return;
        };
        if count == 0 {
            warn!(address = addr, "Ignoring free of zero slots");
            return;
        }
        let Some(start) = self.slot_of(addr, count) else {
            warn!(
                address = addr,
                count,
                capacity = self.capacity,
                element_size = self.element_size,
                "Ignoring free of address outside the pool"
            );
            return;
        };

        let mut released = 0;
        for slot in start..start + count {
            if self.in_use.read(slot) {
                self.in_use.clear(slot);
                released += 1;
            }
        }
        if released != count {
            warn!(
                address = addr,
                count,
                released,
                "Freed range contained slots that were not allocated"
            );
        }

        if start < self.scan_cursor {
            self.scan_cursor = start;
        }
        self.free_slots += released;
        *address = None;

        debug!(
            address = addr,
            slot = start,
            count,
            free = self.free_slots,
            cursor = self.scan_cursor,
            "Freed pool slots"
        );
    }

    /// Move an allocation of `old_count` slots to a fresh region of `new_count`
    ///
    /// The new region is secured before the old one is released, so the pool
    /// needs `new_count` additional free slots. The first
    /// `min(old_count, new_count)` slots are copied and the rest are zeroed. On
    /// failure the handle and the old region are left untouched.
    pub fn reallocate(
        &mut self,
        address: &mut Option<Address>,
        old_count: Size,
        new_count: Size,
    ) -> MemoryResult<Address> {
        if old_count == new_count {
            return Err(MemoryError::SameSizeReallocation(old_count));
        }
        let old = address.ok_or(MemoryError::EmptyHandle)?;
        if old_count == 0 {
            return Err(MemoryError::InvalidCount);
        }
        if self.slot_of(old, old_count).is_none() {
            return Err(MemoryError::InvalidAddress(old));
        }

        let new = self.allocate_zeroed(new_count)?;
        let copied = old_count.min(new_count) * self.element_size;
        self.data.copy_within(old..old + copied, new);

        self.free(address, old_count);
        *address = Some(new);

        debug!(
            from = old,
            to = new,
            old_count,
            new_count,
            "Reallocated pool slots"
        );
        Ok(new)
    }

    /// Search for `count` consecutive free slots
    fn find_run(&self, count: Size) -> Option<Run> {
        let mut crossed_occupied = false;
        let mut run = 0;
        let mut slot = self.scan_cursor;
        while run != count {
            if slot == self.capacity {
                return None;
            }
            if self.in_use.read(slot) {
                crossed_occupied = true;
                run = 0;
            } else {
                run += 1;
            }
            slot += 1;
        }

        Some(Run {
            start: slot - count,
            crossed_occupied,
        })
    }

    fn check_pressure(&self) {
        let ratio = self.used_slots() as f64 / self.capacity as f64;
        if ratio >= PRESSURE_WARNING_RATIO {
            let level = MemoryPressure::from_ratio(ratio);
            warn!(
                level = %level,
                used = self.used_slots(),
                capacity = self.capacity,
                "Memory pool pressure {}: {:.1}% used",
                level,
                ratio * 100.0
            );
        }
    }
}
