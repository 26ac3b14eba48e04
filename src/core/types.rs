/*!
 * Core Types
 * Common types used across the toolkit
 */

/// Byte offset of an allocation inside a pool's backing store
///
/// The address is the identity of an allocation: the pool recovers the
/// occupied slot range from `(address, element_size, count)` alone.
pub type Address = usize;

/// Size type for slot counts and byte widths
pub type Size = usize;
