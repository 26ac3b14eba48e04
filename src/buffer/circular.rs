/*!
 * Circular Cursors
 * Always-overwrite ring with a replaying reader
 */

use super::Cursors;
use crate::core::types::Size;

/// Reserve the slot for the next element, overwriting when full
pub(super) fn push(cursors: &mut Cursors) -> Size {
    if cursors.pending < cursors.capacity {
        cursors.pending += 1;
    }
    let slot = cursors.write;
    cursors.write = cursors.next(slot);
    slot
}

/// Read the element under the read cursor without consuming it
///
/// The reader wraps after the last pending slot rather than at capacity, so it
/// cycles over the slots written so far.
pub(super) fn pop(cursors: &mut Cursors) -> Option<Size> {
    if cursors.pending == 0 {
        return None;
    }
    let slot = cursors.read;
    cursors.read = if slot + 1 >= cursors.pending { 0 } else { slot + 1 };
    Some(slot)
}
