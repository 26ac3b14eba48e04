/*!
 * Data Bank Configuration
 * Width classes and arena sizing
 */

use crate::core::limits::{DEFAULT_CLASS_WIDTHS, DEFAULT_POOL_CAPACITY, WIDTH_CLASS_COUNT};
use crate::core::types::Size;
use crate::memory::bitvector::required_cells;
use crate::memory::types::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};

/// One pool of the bank: slots of `width` bytes, `capacity` of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthClass {
    pub width: Size,
    pub capacity: Size,
}

impl WidthClass {
    pub const fn new(width: Size, capacity: Size) -> Self {
        Self { width, capacity }
    }

    /// Backing bytes this class needs
    #[inline]
    pub const fn data_bytes(&self) -> Size {
        self.width * self.capacity
    }

    /// Bitmap cells this class needs
    #[inline]
    pub const fn occupancy_cells(&self) -> Size {
        required_cells(self.capacity)
    }
}

/// Layout of a [`DataBank`](super::DataBank)
///
/// Widths must be strictly ascending; requests are served by the narrowest
/// class that fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataBankConfig {
    pub classes: [WidthClass; WIDTH_CLASS_COUNT],
}

impl DataBankConfig {
    /// Widths 1/2/4/8 with the default capacity each
    pub const DEFAULT: Self = Self::uniform(DEFAULT_POOL_CAPACITY);

    /// Default widths, `capacity` slots per class
    pub const fn uniform(capacity: Size) -> Self {
        Self::with_capacities([capacity; WIDTH_CLASS_COUNT])
    }

    /// Default widths with a capacity per class
    pub const fn with_capacities(capacities: [Size; WIDTH_CLASS_COUNT]) -> Self {
        let mut classes = [WidthClass::new(0, 0); WIDTH_CLASS_COUNT];
        let mut i = 0;
        while i < WIDTH_CLASS_COUNT {
            classes[i] = WidthClass::new(DEFAULT_CLASS_WIDTHS[i], capacities[i]);
            i += 1;
        }
        Self { classes }
    }

    /// Size of the data arena [`DataBank::new`](super::DataBank::new) expects
    pub const fn data_bytes(&self) -> Size {
        let mut total = 0;
        let mut i = 0;
        while i < WIDTH_CLASS_COUNT {
            total += self.classes[i].data_bytes();
            i += 1;
        }
        total
    }

    /// Size of the cell arena [`DataBank::new`](super::DataBank::new) expects
    pub const fn occupancy_cells(&self) -> Size {
        let mut total = 0;
        let mut i = 0;
        while i < WIDTH_CLASS_COUNT {
            total += self.classes[i].occupancy_cells();
            i += 1;
        }
        total
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> MemoryResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MemoryError::InvalidConfig(format!("Failed to parse bank config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MemoryResult<()> {
        let mut previous = 0;
        let mut data_total: Size = 0;
        let mut cell_total: Size = 0;
        for class in &self.classes {
            if class.width == 0 {
                return Err(MemoryError::InvalidConfig(
                    "width class with zero width".to_string(),
                ));
            }
            if class.width <= previous {
                return Err(MemoryError::InvalidConfig(format!(
                    "width classes must be strictly ascending ({} after {})",
                    class.width, previous
                )));
            }
            if class.capacity == 0 {
                return Err(MemoryError::InvalidConfig(format!(
                    "width class {} has zero capacity",
                    class.width
                )));
            }
            let bytes = class.width.checked_mul(class.capacity).ok_or_else(|| {
                MemoryError::InvalidConfig(format!(
                    "width class {} with {} slots overflows the address space",
                    class.width, class.capacity
                ))
            })?;
            // data_bytes() and occupancy_cells() sum unchecked
            let overflow = || {
                MemoryError::InvalidConfig(format!(
                    "bank arenas overflow the address space at width class {}",
                    class.width
                ))
            };
            data_total = data_total.checked_add(bytes).ok_or_else(overflow)?;
            cell_total = cell_total
                .checked_add(class.occupancy_cells())
                .ok_or_else(overflow)?;
            previous = class.width;
        }
        Ok(())
    }

    /// Index of the narrowest class holding `size` bytes
    pub fn class_index(&self, size: Size) -> Option<usize> {
        if size == 0 {
            return None;
        }
        self.classes.iter().position(|class| class.width >= size)
    }

    /// Width of the widest class
    pub fn max_width(&self) -> Size {
        self.classes[WIDTH_CLASS_COUNT - 1].width
    }
}

impl Default for DataBankConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
