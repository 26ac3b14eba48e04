/*!
 * Core Module
 * Fundamental types, limits, bit helpers and error handling
 */

pub mod bits;
pub mod element;
pub mod errors;
pub mod limits;
pub mod types;

// Re-export for convenience
pub use bits::Bits;
pub use element::Element;
pub use errors::*;
pub use types::*;
