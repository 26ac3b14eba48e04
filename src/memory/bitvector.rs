/*!
 * Bit Vector
 * Packed occupancy bits, eight per byte cell
 */

use super::types::{MemoryError, MemoryResult};
use crate::core::bits::Bits;
use crate::core::types::Size;

/// Number of byte cells needed to hold `bits` bits
///
/// Always reserves one cell past `bits >> 3` once `bits` reaches 8, so exact
/// multiples of 8 get a spare cell.
#[inline]
pub const fn required_cells(bits: Size) -> Size {
    if bits < 8 {
        1
    } else {
        (bits >> 3) + 1
    }
}

/// Bit vector over caller-provided cells
///
/// Position `pos` lives in cell `pos >> 3` at bit `pos & 7`. Positions must be
/// below `len()`; this is only checked in debug builds.
#[derive(Debug)]
pub struct BitVector<'a> {
    cells: &'a mut [u8],
    len: Size,
}

impl<'a> BitVector<'a> {
    /// Wrap `cells` as a vector of `len` bits
    ///
    /// Existing cell contents are kept; call [`BitVector::clear_all`] to start
    /// from an empty vector.
    pub fn new(cells: &'a mut [u8], len: Size) -> MemoryResult<Self> {
        let required = required_cells(len);
        if cells.len() < required {
            return Err(MemoryError::OccupancyTooSmall {
                required,
                provided: cells.len(),
            });
        }
        Ok(Self { cells, len })
    }

    #[inline]
    pub fn len(&self) -> Size {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn set(&mut self, pos: Size) {
        debug_assert!(pos < self.len, "bit {} out of range ({})", pos, self.len);
        self.cells[pos >> 3].set_bit((pos & 7) as u32);
    }

    #[inline]
    pub fn clear(&mut self, pos: Size) {
        debug_assert!(pos < self.len, "bit {} out of range ({})", pos, self.len);
        self.cells[pos >> 3].clear_bit((pos & 7) as u32);
    }

    #[inline]
    pub fn read(&self, pos: Size) -> bool {
        debug_assert!(pos < self.len, "bit {} out of range ({})", pos, self.len);
        self.cells[pos >> 3].read_bit((pos & 7) as u32)
    }

    /// Number of set bits among the first `len()` positions
    pub fn count_ones(&self) -> Size {
        (0..self.len).filter(|&pos| self.read(pos)).count()
    }

    /// Clear every cell backing the vector
    pub fn clear_all(&mut self) {
        let used = required_cells(self.len);
        self.cells[..used].fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_cells() {
        assert_eq!(required_cells(0), 1);
        assert_eq!(required_cells(7), 1);
        assert_eq!(required_cells(8), 2);
        assert_eq!(required_cells(15), 2);
        assert_eq!(required_cells(16), 3);
        assert_eq!(required_cells(100), 13);
    }

    #[test]
    fn test_set_clear_read() {
        let mut cells = [0u8; 3];
        let mut bits = BitVector::new(&mut cells, 20).unwrap();

        bits.set(0);
        bits.set(9);
        bits.set(19);
        assert!(bits.read(0));
        assert!(bits.read(9));
        assert!(!bits.read(10));
        assert_eq!(bits.count_ones(), 3);

        bits.clear(9);
        assert!(!bits.read(9));
        assert_eq!(bits.count_ones(), 2);

        drop(bits);
        assert_eq!(cells, [0b0000_0001, 0b0000_0000, 0b0000_1000]);
    }

    #[test]
    fn test_short_cell_slice_is_rejected() {
        let mut cells = [0u8; 2];
        let err = BitVector::new(&mut cells, 16).unwrap_err();
        assert_eq!(
            err,
            MemoryError::OccupancyTooSmall {
                required: 3,
                provided: 2
            }
        );
    }

    #[test]
    fn test_cells_do_not_alias() {
        let mut cells = [0u8; 3];
        let mut bits = BitVector::new(&mut cells, 16).unwrap();
        bits.set(7);
        bits.set(8);
        bits.clear(7);
        assert!(bits.read(8));
        assert!(!bits.read(7));
    }

    #[test]
    fn test_clear_all() {
        let mut cells = [0xFFu8; 2];
        let mut bits = BitVector::new(&mut cells, 8).unwrap();
        assert_eq!(bits.count_ones(), 8);
        bits.clear_all();
        assert_eq!(bits.count_ones(), 0);
    }
}
