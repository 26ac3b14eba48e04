/*!
 * Linked Lists
 *
 * Singly-linked lists whose nodes live in a node pool and whose payloads live
 * in a data bank.
 *
 * ## Kinds
 *
 * - **FixedWidth**: every element has the width chosen at creation
 * - **Mixed**: each node records its own payload width
 *
 * Insertion and removal walk the list from the head, so both are O(n).
 * A list only holds its head handle and length; all storage belongs to the
 * [`ListArena`] passed to each operation, which lets many lists share one
 * arena.
 */

mod node;

pub use node::NODE_WIDTH;

use crate::core::element::Element;
use crate::core::errors::{ListError, ListResult};
use crate::core::limits::DEFAULT_LIST_NODE_CAPACITY;
use crate::core::types::{Address, Size};
use crate::memory::{required_cells, DataBank, MemoryPool, PoolStorage};
use node::Node;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Storage for a node pool of the default size
pub type DefaultNodeStorage = PoolStorage<
    { DEFAULT_LIST_NODE_CAPACITY * NODE_WIDTH },
    { required_cells(DEFAULT_LIST_NODE_CAPACITY) },
>;

/// Element layout of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListKind {
    /// Every element is exactly this many bytes
    FixedWidth(Size),
    /// Element widths vary per node
    Mixed,
}

/// Node pool and payload bank shared by lists
#[derive(Debug)]
pub struct ListArena<'a> {
    nodes: MemoryPool<'a>,
    bank: DataBank<'a>,
}

impl<'a> ListArena<'a> {
    /// Combine a node pool of [`NODE_WIDTH`]-byte slots with a payload bank
    pub fn new(nodes: MemoryPool<'a>, bank: DataBank<'a>) -> ListResult<Self> {
        if nodes.element_size() != NODE_WIDTH {
            return Err(ListError::InvalidNodePool {
                expected: NODE_WIDTH,
                provided: nodes.element_size(),
            });
        }
        Ok(Self { nodes, bank })
    }

    /// Nodes still available
    pub fn free_nodes(&self) -> Size {
        self.nodes.free_slots()
    }

    pub fn nodes(&self) -> &MemoryPool<'a> {
        &self.nodes
    }

    pub fn bank(&self) -> &DataBank<'a> {
        &self.bank
    }

    fn node(&self, address: Address) -> ListResult<Node> {
        Node::load(&self.nodes, address)
    }

    fn payload(&self, node: &Node) -> Option<&[u8]> {
        self.bank
            .bytes(node.width, node.payload, 1)
            .map(|bytes| &bytes[..node.width])
    }

    /// Allocate a node holding a copy of `data`
    ///
    /// The node slot is returned to the pool if the payload cannot be stored.
    fn create(&mut self, data: &[u8], next: Option<Address>) -> ListResult<Address> {
        let address = self.nodes.allocate_zeroed(1)?;
        match self.fill(address, data, next) {
            Ok(()) => Ok(address),
            Err(e) => {
                self.nodes.free(&mut Some(address), 1);
                Err(e)
            }
        }
    }

    fn fill(&mut self, address: Address, data: &[u8], next: Option<Address>) -> ListResult<()> {
        let width = data.len();
        let payload = self.bank.allocate_zeroed(width, 1)?;
        let node = Node {
            payload,
            next,
            width,
        };
        let stored = match self.bank.bytes_mut(width, payload, 1) {
            Some(bytes) => {
                bytes[..width].copy_from_slice(data);
                node.store(&mut self.nodes, address)
            }
            None => Err(ListError::Corrupted(payload)),
        };
        if stored.is_err() {
            self.bank.free(width, &mut Some(payload), 1);
        }
        stored
    }

    /// Return a node and its payload to their pools
    fn release(&mut self, address: Address, node: &Node) {
        self.bank.free(node.width, &mut Some(node.payload), 1);
        self.nodes.free(&mut Some(address), 1);
    }

    /// Create a node behind `prev` and relink `prev` to it
    fn insert_after(
        &mut self,
        prev_address: Address,
        mut prev: Node,
        data: &[u8],
    ) -> ListResult<Address> {
        let address = self.create(data, prev.next)?;
        prev.next = Some(address);
        if let Err(e) = prev.store(&mut self.nodes, prev_address) {
            if let Ok(node) = self.node(address) {
                self.release(address, &node);
            }
            return Err(e);
        }
        Ok(address)
    }
}

/// Singly-linked list stored in a [`ListArena`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedList {
    kind: ListKind,
    head: Option<Address>,
    len: Size,
}

impl LinkedList {
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            head: None,
            len: 0,
        }
    }

    /// List of `width`-byte elements
    pub fn typed(width: Size) -> Self {
        Self::new(ListKind::FixedWidth(width))
    }

    /// List of elements with individual widths
    pub fn untyped() -> Self {
        Self::new(ListKind::Mixed)
    }

    /// List of `T` values
    pub fn for_element<T: Element>() -> Self {
        Self::typed(T::WIDTH)
    }

    #[inline]
    pub fn kind(&self) -> ListKind {
        self.kind
    }

    #[inline]
    pub fn len(&self) -> Size {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a copy of `data` so that it ends up at `position`
    pub fn insert(&mut self, arena: &mut ListArena<'_>, data: &[u8], position: Size) -> ListResult<()> {
        if position > self.len {
            return Err(ListError::IndexOutOfRange {
                position,
                len: self.len,
            });
        }
        if data.is_empty() {
            return Err(ListError::EmptyData);
        }
        if let ListKind::FixedWidth(width) = self.kind {
            if data.len() != width {
                return Err(ListError::WidthMismatch {
                    expected: width,
                    provided: data.len(),
                });
            }
        }

        if position == 0 {
            let address = arena.create(data, self.head)?;
            self.head = Some(address);
        } else {
            let (prev_address, prev) = self.locate(arena, position - 1)?;
            arena.insert_after(prev_address, prev, data)?;
        }
        self.len += 1;

        debug!(position, width = data.len(), len = self.len, "Inserted list element");
        Ok(())
    }

    pub fn insert_start(&mut self, arena: &mut ListArena<'_>, data: &[u8]) -> ListResult<()> {
        self.insert(arena, data, 0)
    }

    pub fn insert_end(&mut self, arena: &mut ListArena<'_>, data: &[u8]) -> ListResult<()> {
        self.insert(arena, data, self.len)
    }

    /// Insert a typed value at `position`
    pub fn insert_value<T: Element>(
        &mut self,
        arena: &mut ListArena<'_>,
        value: T,
        position: Size,
    ) -> ListResult<()> {
        let mut encoded = [0u8; 16];
        let width = T::WIDTH.min(encoded.len());
        value.write_le(&mut encoded[..width]);
        self.insert(arena, &encoded[..width], position)
    }

    /// Remove the element at `position`, releasing its node and payload
    pub fn remove(&mut self, arena: &mut ListArena<'_>, position: Size) -> ListResult<()> {
        if position >= self.len {
            return Err(ListError::IndexOutOfRange {
                position,
                len: self.len,
            });
        }

        let (address, node) = if position == 0 {
            let address = self.head.ok_or(ListError::MissingHead(self.len))?;
            let node = arena.node(address)?;
            self.head = node.next;
            (address, node)
        } else {
            let (prev_address, mut prev) = self.locate(arena, position - 1)?;
            let address = prev.next.ok_or(ListError::Corrupted(prev_address))?;
            let node = arena.node(address)?;
            prev.next = node.next;
            prev.store(&mut arena.nodes, prev_address)?;
            (address, node)
        };
        arena.release(address, &node);
        self.len -= 1;

        debug!(position, len = self.len, "Removed list element");
        Ok(())
    }

    /// Remove every element
    pub fn clear(&mut self, arena: &mut ListArena<'_>) -> ListResult<()> {
        while !self.is_empty() {
            self.remove(arena, 0)?;
        }
        Ok(())
    }

    /// Borrow the element at `position`
    pub fn get<'b>(&self, arena: &'b ListArena<'_>, position: Size) -> Option<&'b [u8]> {
        if position >= self.len {
            return None;
        }
        let (_, node) = self.locate(arena, position).ok()?;
        arena.payload(&node)
    }

    /// Payload width of the element at `position`
    pub fn width_at(&self, arena: &ListArena<'_>, position: Size) -> Option<Size> {
        if position >= self.len {
            return None;
        }
        self.locate(arena, position).ok().map(|(_, node)| node.width)
    }

    /// Read the element at `position` as a `T`
    ///
    /// Returns `None` unless the stored width is exactly `T::WIDTH`.
    pub fn get_value<T: Element>(&self, arena: &ListArena<'_>, position: Size) -> Option<T> {
        let bytes = self.get(arena, position)?;
        if bytes.len() != T::WIDTH {
            return None;
        }
        T::read_le(bytes)
    }

    /// Iterate over element payloads from head to tail
    pub fn iter<'b, 'a>(&self, arena: &'b ListArena<'a>) -> Iter<'b, 'a> {
        Iter {
            arena,
            next: self.head,
            remaining: self.len,
        }
    }

    /// Walk to the node at `position`
    fn locate(&self, arena: &ListArena<'_>, position: Size) -> ListResult<(Address, Node)> {
        let mut address = self.head.ok_or(ListError::MissingHead(self.len))?;
        let mut node = arena.node(address)?;
        for _ in 0..position {
            address = node.next.ok_or(ListError::Corrupted(address))?;
            node = arena.node(address)?;
        }
        Ok((address, node))
    }
}

/// Iterator over list payloads
pub struct Iter<'b, 'a> {
    arena: &'b ListArena<'a>,
    next: Option<Address>,
    remaining: Size,
}

impl<'b> Iterator for Iter<'b, '_> {
    type Item = &'b [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.arena.node(self.next?).ok()?;
        self.next = node.next;
        self.remaining -= 1;
        self.arena.payload(&node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
