/*!
 * Memory Types
 * Common types for the pool allocator
 */

use crate::core::limits::{PRESSURE_CRITICAL_RATIO, PRESSURE_MEDIUM_RATIO, PRESSURE_WARNING_RATIO};
use crate::core::types::{Address, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("Pool capacity must be at least one slot")]
    #[diagnostic(code(memory::zero_capacity))]
    ZeroCapacity,

    #[error("Pool element size must be at least one byte")]
    #[diagnostic(code(memory::zero_element_size))]
    ZeroElementSize,

    #[error("Backing store too small: {required} bytes required, {provided} bytes provided")]
    #[diagnostic(
        code(memory::backing_too_small),
        help("Size the backing array as capacity * element_size bytes.")
    )]
    BackingTooSmall { required: Size, provided: Size },

    #[error("Occupancy bitmap too small: {required} cells required, {provided} cells provided")]
    #[diagnostic(
        code(memory::occupancy_too_small),
        help("Size the bitmap with required_cells(capacity).")
    )]
    OccupancyTooSmall { required: Size, provided: Size },

    #[error("Allocation count must be at least one slot")]
    #[diagnostic(code(memory::invalid_count))]
    InvalidCount,

    #[error("Out of slots: requested {requested}, only {free} free")]
    #[diagnostic(
        code(memory::out_of_slots),
        help("Free unused allocations or enlarge the pool capacity.")
    )]
    OutOfSlots { requested: Size, free: Size },

    #[error("No run of {requested} contiguous free slots reachable from slot {cursor} ({free} free in total)")]
    #[diagnostic(
        code(memory::no_contiguous_run),
        help("The pool is fragmented. Check max_contiguous_free_space() before allocating.")
    )]
    NoContiguousRun {
        requested: Size,
        free: Size,
        cursor: Size,
    },

    #[error("Reallocation to the same size ({0} slots) is not allowed")]
    #[diagnostic(code(memory::same_size_reallocation))]
    SameSizeReallocation(Size),

    #[error("Allocation handle is empty")]
    #[diagnostic(code(memory::empty_handle))]
    EmptyHandle,

    #[error("Invalid pool address: 0x{0:x}")]
    #[diagnostic(code(memory::invalid_address))]
    InvalidAddress(Address),

    #[error("Unrecognized element size: {0} bytes")]
    #[diagnostic(
        code(memory::unrecognized_size),
        help("Element sizes must be between 1 and the widest configured width class.")
    )]
    UnrecognizedSize(Size),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(memory::invalid_config))]
    InvalidConfig(String),
}

/// Fragmentation state of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FragmentationState {
    Unfragmented,
    Fragmented,
}

impl std::fmt::Display for FragmentationState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FragmentationState::Unfragmented => write!(f, "UNFRAGMENTED"),
            FragmentationState::Fragmented => write!(f, "FRAGMENTED"),
        }
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    /// Classify a usage ratio in `0.0..=1.0`
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= PRESSURE_CRITICAL_RATIO {
            MemoryPressure::Critical
        } else if ratio >= PRESSURE_WARNING_RATIO {
            MemoryPressure::High
        } else if ratio >= PRESSURE_MEDIUM_RATIO {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Pool statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    pub capacity: Size,
    pub element_size: Size,
    pub used_slots: Size,
    pub free_slots: Size,
    pub largest_free_run: Size,
    pub fragmentation: FragmentationState,
    pub usage_percentage: f64,
}

impl PoolStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.usage_percentage / 100.0)
    }
}
