/*!
 * Bit Manipulation
 * Stateless bit and byte helpers over unsigned integers
 *
 * Position 0 is always the least significant bit (or byte). Positions past the
 * width of the integer shift everything out instead of overflowing.
 */

/// Bit and byte manipulation on fixed-width unsigned integers
pub trait Bits: Copy {
    /// Width of the integer in bits
    const WIDTH: u32;

    /// Set a single bit
    fn set_bit(&mut self, position: u32);

    /// OR `pattern`, shifted left by `position`, into the value
    fn set_bits(&mut self, position: u32, pattern: Self);

    /// Set every bit of byte `index`
    fn set_byte(&mut self, index: u32);

    /// Clear a single bit
    fn clear_bit(&mut self, position: u32);

    /// Clear `count` bits starting at `position`
    fn clear_bits(&mut self, position: u32, count: u32);

    /// Clear every bit of byte `index`
    fn clear_byte(&mut self, index: u32);

    fn read_bit(self, position: u32) -> bool;

    /// Select `count` bits starting at `position`
    ///
    /// The selection stays in place: bits outside the window are zeroed but the
    /// result is not shifted down.
    fn read_bits(self, position: u32, count: u32) -> Self;

    fn read_byte(self, index: u32) -> u8;

    /// Toggle a single bit
    fn invert_bit(&mut self, position: u32);

    /// Toggle every bit
    fn invert_all(&mut self);

    /// Replace `count` bits at `position` with the bits of `source` found at
    /// `source_position`
    fn copy_bits(&mut self, position: u32, source: Self, source_position: u32, count: u32);

    /// Replace byte `index` with byte `source_index` of `source`
    fn copy_byte(&mut self, index: u32, source: Self, source_index: u32);
}

macro_rules! low_mask {
    ($t:ty, $count:expr) => {
        if $count >= <$t>::BITS {
            <$t>::MAX
        } else {
            ((1 as $t) << $count) - 1
        }
    };
}

macro_rules! impl_bits {
    ($($t:ty),* $(,)?) => {
        $(
            impl Bits for $t {
                const WIDTH: u32 = <$t>::BITS;

                #[inline]
                fn set_bit(&mut self, position: u32) {
                    *self |= (1 as $t).checked_shl(position).unwrap_or(0);
                }

                #[inline]
                fn set_bits(&mut self, position: u32, pattern: Self) {
                    *self |= pattern.checked_shl(position).unwrap_or(0);
                }

                #[inline]
                fn set_byte(&mut self, index: u32) {
                    *self |= (0xFF as $t).checked_shl(index * 8).unwrap_or(0);
                }

                #[inline]
                fn clear_bit(&mut self, position: u32) {
                    *self &= !(1 as $t).checked_shl(position).unwrap_or(0);
                }

                #[inline]
                fn clear_bits(&mut self, position: u32, count: u32) {
                    let mask = low_mask!($t, count);
                    *self &= !mask.checked_shl(position).unwrap_or(0);
                }

                #[inline]
                fn clear_byte(&mut self, index: u32) {
                    *self &= !(0xFF as $t).checked_shl(index * 8).unwrap_or(0);
                }

                #[inline]
                fn read_bit(self, position: u32) -> bool {
                    self.checked_shr(position).unwrap_or(0) & 1 == 1
                }

                #[inline]
                fn read_bits(self, position: u32, count: u32) -> Self {
                    let mask = low_mask!($t, count);
                    self & mask.checked_shl(position).unwrap_or(0)
                }

                #[inline]
                fn read_byte(self, index: u32) -> u8 {
                    (self.checked_shr(index * 8).unwrap_or(0) & 0xFF) as u8
                }

                #[inline]
                fn invert_bit(&mut self, position: u32) {
                    *self ^= (1 as $t).checked_shl(position).unwrap_or(0);
                }

                #[inline]
                fn invert_all(&mut self) {
                    *self = !*self;
                }

                fn copy_bits(&mut self, position: u32, source: Self, source_position: u32, count: u32) {
                    self.clear_bits(position, count);
                    let selected = source
                        .read_bits(source_position, count)
                        .checked_shr(source_position)
                        .unwrap_or(0);
                    *self |= selected.checked_shl(position).unwrap_or(0);
                }

                fn copy_byte(&mut self, index: u32, source: Self, source_index: u32) {
                    self.clear_byte(index);
                    let byte = source.read_byte(source_index) as $t;
                    *self |= byte.checked_shl(index * 8).unwrap_or(0);
                }
            }
        )*
    };
}

impl_bits!(u8, u16, u32, u64, usize);
