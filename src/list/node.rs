/*!
 * List Nodes
 * Fixed-width node records stored in a pool slot
 */

use crate::core::element::Element;
use crate::core::errors::{ListError, ListResult};
use crate::core::types::{Address, Size};
use crate::memory::SlotAllocator;

/// Bytes per node slot: payload address, next link, payload width
pub const NODE_WIDTH: Size = 17;

const PAYLOAD: std::ops::Range<usize> = 0..8;
const NEXT: std::ops::Range<usize> = 8..16;
const WIDTH: usize = 16;

/// Encoded link value meaning "end of list"
const NIL: u64 = u64::MAX;

/// Decoded node record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Node {
    pub payload: Address,
    pub next: Option<Address>,
    pub width: Size,
}

impl Node {
    fn encode(&self, out: &mut [u8]) -> bool {
        let Ok(width) = u8::try_from(self.width) else {
            return false;
        };
        if out.len() < NODE_WIDTH {
            return false;
        }
        let next = self.next.map_or(NIL, |a| a as u64);
        (self.payload as u64).write_le(&mut out[PAYLOAD])
            && next.write_le(&mut out[NEXT])
            && width.write_le(&mut out[WIDTH..])
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let payload = u64::read_le(bytes.get(PAYLOAD)?)?;
        let next = u64::read_le(bytes.get(NEXT)?)?;
        let width = u8::read_le(bytes.get(WIDTH..)?)?;
        Some(Self {
            payload: usize::try_from(payload).ok()?,
            next: if next == NIL {
                None
            } else {
                Some(usize::try_from(next).ok()?)
            },
            width: Size::from(width),
        })
    }

    /// Read the node stored at `address`
    pub fn load<A: SlotAllocator>(nodes: &A, address: Address) -> ListResult<Self> {
        nodes
            .bytes(address, 1)
            .and_then(Self::decode)
            .ok_or(ListError::Corrupted(address))
    }

    /// Write this node to `address`
    pub fn store<A: SlotAllocator>(&self, nodes: &mut A, address: Address) -> ListResult<()> {
        let slot = nodes
            .bytes_mut(address, 1)
            .ok_or(ListError::Corrupted(address))?;
        if self.encode(slot) {
            Ok(())
        } else {
            Err(ListError::Corrupted(address))
        }
    }
}
