/*!
 * Memory Module
 * Fixed-capacity pools, their occupancy bitmap and the width-class bank
 */

pub mod bank;
pub mod bitvector;
pub mod pool;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use bank::{DataBank, DataBankConfig, WidthClass};
pub use bitvector::{required_cells, BitVector};
pub use pool::{MemoryPool, PoolStorage};
pub use traits::*;
pub use types::*;
