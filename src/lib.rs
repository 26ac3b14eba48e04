/*!
 * Poolbank
 * Fixed-capacity memory pools, width-class banks, buffers and lists
 */

pub mod buffer;
pub mod core;
pub mod list;
pub mod memory;
pub mod monitoring;

// Re-exports
pub use buffer::{Buffer, BufferKind};
pub use crate::core::{Address, Bits, Element, ListError, ListResult, Size};
pub use list::{LinkedList, ListArena, ListKind, NODE_WIDTH};
pub use memory::{
    required_cells, BitVector, DataBank, DataBankConfig, FragmentationState, MemoryError,
    MemoryPool, MemoryPressure, MemoryResult, PoolInfo, PoolStats, PoolStorage, SlotAllocator,
    WidthClass,
};
pub use monitoring::{init_tracing, span_operation};
