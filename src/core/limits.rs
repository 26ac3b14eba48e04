/*!
 * Limits and Constants
 *
 * Compile-time configuration for the pools. Values are fixed before first
 * use and never change afterwards.
 */

// =============================================================================
// DATA BANK
// =============================================================================

/// Number of width classes owned by a data bank
pub const WIDTH_CLASS_COUNT: usize = 4;

/// Default width classes in bytes, ascending
pub const DEFAULT_CLASS_WIDTHS: [usize; WIDTH_CLASS_COUNT] = [1, 2, 4, 8];

/// Default slot count of every width class
pub const DEFAULT_POOL_CAPACITY: usize = 100;

// =============================================================================
// LINKED LISTS
// =============================================================================

/// Default node count of a list arena
pub const DEFAULT_LIST_NODE_CAPACITY: usize = 100;

// =============================================================================
// MEMORY PRESSURE
// =============================================================================

/// Usage ratio at which allocations start logging warnings
pub const PRESSURE_WARNING_RATIO: f64 = 0.80;

/// Usage ratio considered critical
pub const PRESSURE_CRITICAL_RATIO: f64 = 0.95;

/// Usage ratio reported as medium pressure
pub const PRESSURE_MEDIUM_RATIO: f64 = 0.60;
