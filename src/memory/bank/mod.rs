/*!
 * Data Bank
 *
 * One memory pool per width class, addressed by element size.
 *
 * A request for `size` bytes goes to the narrowest class whose width is at
 * least `size`. With the default ladder (1/2/4/8) a 3-byte element lands in
 * the 4-byte pool. Sizes of 0 or wider than the widest class are rejected
 * with [`MemoryError::UnrecognizedSize`].
 *
 * The bank owns no storage of its own: it carves a caller-supplied data arena
 * and cell arena into the four pools, in class order.
 */

mod config;

pub use config::{DataBankConfig, WidthClass};

use super::pool::MemoryPool;
use super::types::{FragmentationState, MemoryError, MemoryResult, PoolStats};
use crate::core::limits::WIDTH_CLASS_COUNT;
use crate::core::types::{Address, Size};
use tracing::{debug, warn};

/// Width-class façade over four pools
#[derive(Debug)]
pub struct DataBank<'a> {
    config: DataBankConfig,
    pools: [MemoryPool<'a>; WIDTH_CLASS_COUNT],
}

/// Split the first `len` bytes off `arena`
fn carve<'a>(arena: &mut &'a mut [u8], len: usize) -> &'a mut [u8] {
    let (head, tail) = std::mem::take(arena).split_at_mut(len);
    *arena = tail;
    head
}

impl<'a> DataBank<'a> {
    /// Build the pools described by `config` over the given arenas
    ///
    /// `data` must hold `config.data_bytes()` bytes and `cells`
    /// `config.occupancy_cells()` cells.
    pub fn new(
        config: DataBankConfig,
        mut data: &'a mut [u8],
        mut cells: &'a mut [u8],
    ) -> MemoryResult<Self> {
        config.validate()?;

        let data_bytes = config.data_bytes();
        if data.len() < data_bytes {
            return Err(MemoryError::BackingTooSmall {
                required: data_bytes,
                provided: data.len(),
            });
        }
        let occupancy_cells = config.occupancy_cells();
        if cells.len() < occupancy_cells {
            return Err(MemoryError::OccupancyTooSmall {
                required: occupancy_cells,
                provided: cells.len(),
            });
        }

        let mut build = |class: WidthClass| {
            let class_data = carve(&mut data, class.data_bytes());
            let class_cells = carve(&mut cells, class.occupancy_cells());
            MemoryPool::new(class.capacity, class.width, class_data, class_cells)
        };
        let [c0, c1, c2, c3] = config.classes;
        let pools = [build(c0)?, build(c1)?, build(c2)?, build(c3)?];

        debug!(
            widths = ?config.classes.map(|c| c.width),
            data_bytes,
            occupancy_cells,
            "Data bank initialized"
        );

        Ok(Self { config, pools })
    }

    #[inline]
    pub fn config(&self) -> &DataBankConfig {
        &self.config
    }

    fn class_index(&self, size: Size) -> MemoryResult<usize> {
        self.config
            .class_index(size)
            .ok_or(MemoryError::UnrecognizedSize(size))
    }

    /// Pool serving elements of `size` bytes
    pub fn pool(&self, size: Size) -> MemoryResult<&MemoryPool<'a>> {
        let index = self.class_index(size)?;
        Ok(&self.pools[index])
    }

    pub fn pool_mut(&mut self, size: Size) -> MemoryResult<&mut MemoryPool<'a>> {
        let index = self.class_index(size)?;
        Ok(&mut self.pools[index])
    }

    /// Allocate `count` elements of `size` bytes
    pub fn allocate(&mut self, size: Size, count: Size) -> MemoryResult<Address> {
        self.pool_mut(size)?.allocate(count)
    }

    pub fn allocate_zeroed(&mut self, size: Size, count: Size) -> MemoryResult<Address> {
        self.pool_mut(size)?.allocate_zeroed(count)
    }

    /// Release `count` elements of `size` bytes; unknown sizes are ignored
    pub fn free(&mut self, size: Size, address: &mut Option<Address>, count: Size) {
        match self.pool_mut(size) {
            Ok(pool) => pool.free(address, count),
            Err(_) => warn!(size, ?address, "Ignoring free for unrecognized element size"),
        }
    }

    pub fn reallocate(
        &mut self,
        size: Size,
        address: &mut Option<Address>,
        old_count: Size,
        new_count: Size,
    ) -> MemoryResult<Address> {
        self.pool_mut(size)?
            .reallocate(address, old_count, new_count)
    }

    pub fn check_fragmentation(&self, size: Size) -> MemoryResult<FragmentationState> {
        Ok(self.pool(size)?.check_fragmentation())
    }

    pub fn max_contiguous_free_space(&self, size: Size) -> MemoryResult<Size> {
        Ok(self.pool(size)?.max_contiguous_free_space())
    }

    pub fn free_slots(&self, size: Size) -> MemoryResult<Size> {
        Ok(self.pool(size)?.free_slots())
    }

    /// Borrow `count` elements of `size` bytes at `address`
    pub fn bytes(&self, size: Size, address: Address, count: Size) -> Option<&[u8]> {
        self.pool(size).ok()?.bytes(address, count)
    }

    pub fn bytes_mut(&mut self, size: Size, address: Address, count: Size) -> Option<&mut [u8]> {
        self.pool_mut(size).ok()?.bytes_mut(address, count)
    }

    /// Release every allocation in every pool
    pub fn reset(&mut self) {
        for pool in &mut self.pools {
            pool.reset();
        }
    }

    /// Per-class statistics, narrowest class first
    pub fn stats(&self) -> [PoolStats; WIDTH_CLASS_COUNT] {
        std::array::from_fn(|i| self.pools[i].stats())
    }
}
