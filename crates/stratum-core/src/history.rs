//! Undo/redo over the trail of accepted frames. Both operations jump
//! directly to a named target frame, folding every frame between the
//! current one and the target into the opposite list — this is a constant
//! reference reassignment; no snapshot is touched.

use stratum_value::FrameId;
use tracing::trace;

use crate::memory::Memory;

impl Memory {
    pub fn can_undo(&self) -> bool {
        !self.undo_stack().is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack().is_empty()
    }

    /// Jump to `to`, which must currently be in the undoable list. Every
    /// frame between `to` and the current frame (exclusive of `to`,
    /// inclusive of the current frame) moves to the front of the redoable
    /// list, preserving chronological order.
    ///
    /// Panics if `to` is not in the undoable list.
    pub fn undo(&mut self, to: FrameId) -> FrameId {
        let position = self
            .undo_stack()
            .iter()
            .position(|id| *id == to)
            .unwrap_or_else(|| panic!("frame {to} is not in the undoable list"));

        let current = self
            .current_frame_id()
            .expect("undoable list is non-empty, so a current frame must exist");

        let mut moved = vec![current];
        moved.extend_from_slice(&self.undo_stack()[position + 1..]);

        let mut new_redo = moved;
        new_redo.extend(self.redo_stack().iter().copied());
        *self.redo_stack_mut() = new_redo;

        self.undo_stack_mut().truncate(position);
        self.set_current_frame(to);
        trace!(%to, "undo");
        to
    }

    /// Jump to `to`, which must currently be in the redoable list. Symmetric
    /// to [`Memory::undo`].
    ///
    /// Panics if `to` is not in the redoable list.
    pub fn redo(&mut self, to: FrameId) -> FrameId {
        let position = self
            .redo_stack()
            .iter()
            .position(|id| *id == to)
            .unwrap_or_else(|| panic!("frame {to} is not in the redoable list"));

        let current = self
            .current_frame_id()
            .expect("redoable list is non-empty, so a current frame must exist");

        let skipped: Vec<FrameId> = self.redo_stack()[..position].to_vec();

        self.undo_stack_mut().push(current);
        self.undo_stack_mut().extend(skipped);

        let remainder: Vec<FrameId> = self.redo_stack()[position + 1..].to_vec();
        *self.redo_stack_mut() = remainder;

        self.set_current_frame(to);
        trace!(%to, "redo");
        to
    }
}
