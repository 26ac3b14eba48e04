/*!
 * Buffers
 *
 * Fixed-capacity element buffers over a borrowed byte slice.
 *
 * Every buffer stores `capacity` elements of `element_size` bytes and tracks a
 * read cursor, a write cursor and the number of pending elements. The kind
 * decides how those cursors move:
 *
 * - **Queue**: FIFO ring; a push into a full queue drops the oldest element
 * - **Stack**: LIFO; the read cursor trails the write cursor by one slot
 * - **Circular**: always-overwrite ring; pops replay the stored elements
 *   without consuming them
 *
 * The slice can come from anywhere, including a pool allocation via
 * `MemoryPool::bytes_mut`.
 */

mod circular;
mod queue;
mod stack;

use crate::core::element::Element;
use crate::core::types::Size;
use crate::memory::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cursor policy of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferKind {
    Queue,
    Stack,
    Circular,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BufferKind::Queue => write!(f, "queue"),
            BufferKind::Stack => write!(f, "stack"),
            BufferKind::Circular => write!(f, "circular"),
        }
    }
}

/// Read/write positions shared by all buffer kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Cursors {
    pub read: Size,
    pub write: Size,
    pub pending: Size,
    pub capacity: Size,
}

impl Cursors {
    fn new(capacity: Size) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Slot after `slot`, wrapping at capacity
    #[inline]
    pub fn next(&self, slot: Size) -> Size {
        if slot == self.capacity - 1 {
            0
        } else {
            slot + 1
        }
    }

    /// Slot before `slot`, wrapping at zero
    #[inline]
    pub fn prev(&self, slot: Size) -> Size {
        if slot == 0 {
            self.capacity - 1
        } else {
            slot - 1
        }
    }
}

/// Fixed-capacity element buffer
#[derive(Debug)]
pub struct Buffer<'a> {
    storage: &'a mut [u8],
    element_size: Size,
    kind: BufferKind,
    cursors: Cursors,
}

impl<'a> Buffer<'a> {
    /// Wrap `storage` as a buffer of `capacity` elements of `element_size` bytes
    pub fn new(
        kind: BufferKind,
        element_size: Size,
        capacity: Size,
        storage: &'a mut [u8],
    ) -> MemoryResult<Self> {
        if capacity == 0 {
            return Err(MemoryError::ZeroCapacity);
        }
        if element_size == 0 {
            return Err(MemoryError::ZeroElementSize);
        }
        let required = capacity.checked_mul(element_size).ok_or_else(|| {
            MemoryError::InvalidConfig(format!(
                "{} elements of {} bytes overflow the address space",
                capacity, element_size
            ))
        })?;
        if storage.len() < required {
            return Err(MemoryError::BackingTooSmall {
                required,
                provided: storage.len(),
            });
        }

        let (storage, _) = storage.split_at_mut(required);
        Ok(Self {
            storage,
            element_size,
            kind,
            cursors: Cursors::new(capacity),
        })
    }

    /// Buffer sized for elements of type `T`
    pub fn for_element<T: Element>(
        kind: BufferKind,
        capacity: Size,
        storage: &'a mut [u8],
    ) -> MemoryResult<Self> {
        Self::new(kind, T::WIDTH, capacity, storage)
    }

    /// Store one element
    ///
    /// Copies up to `element_size` bytes of `data`; a shorter `data` is
    /// zero-padded.
    pub fn push(&mut self, data: &[u8]) {
        let slot = self.advance_write();
        let element = self.slot_mut(slot);
        let copied = data.len().min(element.len());
        element[..copied].copy_from_slice(&data[..copied]);
        element[copied..].fill(0);
    }

    /// Store one all-zero element
    pub fn push_zeroed(&mut self) {
        let slot = self.advance_write();
        self.slot_mut(slot).fill(0);
    }

    /// Take the next element according to the buffer kind
    pub fn pop(&mut self) -> Option<&[u8]> {
        let slot = match self.kind {
            BufferKind::Queue => queue::pop(&mut self.cursors),
            BufferKind::Stack => stack::pop(&mut self.cursors),
            BufferKind::Circular => circular::pop(&mut self.cursors),
        }?;
        Some(self.slot(slot))
    }

    /// Store a typed value, truncated to `element_size` bytes if wider
    pub fn push_value<T: Element>(&mut self, value: T) {
        let mut encoded = [0u8; 16];
        let width = T::WIDTH.min(encoded.len());
        if value.write_le(&mut encoded[..width]) {
            self.push(&encoded[..width]);
        } else {
            self.push_zeroed();
        }
    }

    /// Take the next element as a typed value
    ///
    /// Returns `None` when the buffer is empty or elements are narrower than
    /// `T`.
    pub fn pop_value<T: Element>(&mut self) -> Option<T> {
        T::read_le(self.pop()?)
    }

    /// Drop every pending element and rewind both cursors
    pub fn clear(&mut self) {
        self.cursors = Cursors::new(self.cursors.capacity);
    }

    #[inline]
    pub fn pending(&self) -> Size {
        self.cursors.pending
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursors.pending == 0
    }

    #[inline]
    pub fn read_position(&self) -> Size {
        self.cursors.read
    }

    #[inline]
    pub fn write_position(&self) -> Size {
        self.cursors.write
    }

    #[inline]
    pub fn capacity(&self) -> Size {
        self.cursors.capacity
    }

    #[inline]
    pub fn element_size(&self) -> Size {
        self.element_size
    }

    #[inline]
    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    fn advance_write(&mut self) -> Size {
        match self.kind {
            BufferKind::Queue => queue::push(&mut self.cursors),
            BufferKind::Stack => stack::push(&mut self.cursors),
            BufferKind::Circular => circular::push(&mut self.cursors),
        }
    }

    fn slot(&self, slot: Size) -> &[u8] {
        let start = slot * self.element_size;
        &self.storage[start..start + self.element_size]
    }

    fn slot_mut(&mut self, slot: Size) -> &mut [u8] {
        let start = slot * self.element_size;
        &mut self.storage[start..start + self.element_size]
    }
}
