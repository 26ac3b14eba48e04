/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::types::{Address, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export MemoryError from memory module
pub use crate::memory::MemoryError;

/// Linked list errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ListError {
    #[error("Position {position} is out of range for a list of {len} elements")]
    #[diagnostic(
        code(list::index_out_of_range),
        help("Insert positions may equal the list length; other operations need a smaller position.")
    )]
    IndexOutOfRange { position: Size, len: Size },

    #[error("Cannot store an empty payload")]
    #[diagnostic(code(list::empty_data))]
    EmptyData,

    #[error("Payload is {provided} bytes but the list stores {expected}-byte elements")]
    #[diagnostic(
        code(list::width_mismatch),
        help("Typed lists fix their element width at creation. Use an untyped list for mixed widths.")
    )]
    WidthMismatch { expected: Size, provided: Size },

    #[error("Node arena uses {provided}-byte slots, expected {expected}")]
    #[diagnostic(
        code(list::invalid_node_pool),
        help("Create the node pool with NODE_WIDTH as element size.")
    )]
    InvalidNodePool { expected: Size, provided: Size },

    #[error("List storage corrupted at node 0x{0:x}")]
    #[diagnostic(code(list::corrupted))]
    Corrupted(Address),

    #[error("List head missing while {0} elements are recorded")]
    #[diagnostic(code(list::missing_head))]
    MissingHead(Size),

    #[error("List storage unavailable: {0}")]
    #[diagnostic(
        code(list::storage),
        help("The node pool or the data bank ran out of space. Remove elements or enlarge the pools.")
    )]
    Storage(#[from] MemoryError),
}

/// Result type for list operations
pub type ListResult<T> = Result<T, ListError>;
