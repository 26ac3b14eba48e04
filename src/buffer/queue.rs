/*!
 * Queue Cursors
 * FIFO ring that drops the oldest element when full
 */

use super::Cursors;
use crate::core::types::Size;

/// Reserve the slot for the next element
pub(super) fn push(cursors: &mut Cursors) -> Size {
    if cursors.pending == cursors.capacity {
        cursors.read = cursors.next(cursors.read);
    } else {
        cursors.pending += 1;
    }
    let slot = cursors.write;
    cursors.write = cursors.next(slot);
    slot
}

/// Consume the oldest element
pub(super) fn pop(cursors: &mut Cursors) -> Option<Size> {
    if cursors.pending == 0 {
        return None;
    }
    let slot = cursors.read;
    cursors.read = cursors.next(slot);
    cursors.pending -= 1;
    Some(slot)
}
