/*!
 * Fixed-Width Elements
 * Little-endian encoding for values stored in pool slots
 */

/// A plain value with a fixed byte width
///
/// Buffers and lists store raw bytes; this trait converts typed values to and
/// from those bytes. Encoding is always little-endian.
pub trait Element: Copy {
    /// Encoded width in bytes
    const WIDTH: usize;

    /// Write the encoded value into the first `WIDTH` bytes of `out`
    ///
    /// Returns `false` when `out` is too short.
    fn write_le(&self, out: &mut [u8]) -> bool;

    /// Decode a value from the first `WIDTH` bytes of `bytes`
    fn read_le(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_element {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();

                #[inline]
                fn write_le(&self, out: &mut [u8]) -> bool {
                    match out.get_mut(..Self::WIDTH) {
                        Some(slot) => {
                            slot.copy_from_slice(&self.to_le_bytes());
                            true
                        }
                        None => false,
                    }
                }

                #[inline]
                fn read_le(bytes: &[u8]) -> Option<Self> {
                    let raw = bytes.get(..Self::WIDTH)?.try_into().ok()?;
                    Some(<$t>::from_le_bytes(raw))
                }
            }
        )*
    };
}

impl_element!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);
