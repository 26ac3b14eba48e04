/*!
 * Stack Cursors
 * LIFO over a ring; the read cursor sits on the last written slot
 */

use super::Cursors;
use crate::core::types::Size;

/// Reserve the slot for the next element
///
/// Once the stack is full the oldest element is overwritten.
pub(super) fn push(cursors: &mut Cursors) -> Size {
    let slot = cursors.write;
    cursors.read = slot;
    cursors.write = cursors.next(slot);
    if cursors.pending < cursors.capacity {
        cursors.pending += 1;
    }
    slot
}

/// Consume the newest element
///
/// Both cursors step back so the next push reuses the popped slot.
pub(super) fn pop(cursors: &mut Cursors) -> Option<Size> {
    if cursors.pending == 0 {
        return None;
    }
    let slot = cursors.read;
    cursors.write = slot;
    cursors.read = cursors.prev(slot);
    cursors.pending -= 1;
    Some(slot)
}
