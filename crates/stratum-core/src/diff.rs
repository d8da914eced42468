//! Structural diffing between two stable frames — which objects were
//! added, removed, or given a new snapshot. Not part of the distilled
//! object-memory operations, but a natural companion to history: an
//! undo/redo-aware caller summarizing "what changed" needs exactly this.

use stratum_value::{FrameId, ObjectId};

use crate::memory::Memory;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameDiff {
    pub added: Vec<ObjectId>,
    pub removed: Vec<ObjectId>,
    pub changed: Vec<ObjectId>,
}

impl Memory {
    /// Diff two stable frames by object membership and snapshot identity.
    /// An object counts as `changed` when both frames carry it but under a
    /// different `snapshot_id` — structural or attribute changes on an
    /// otherwise-unchanged snapshot id never happen, since validated
    /// snapshots are immutable.
    ///
    /// Panics if either id does not name a stable frame.
    pub fn diff_frames(&self, a: FrameId, b: FrameId) -> FrameDiff {
        let frame_a = self.stable_frame(a).unwrap_or_else(|| panic!("unknown frame: {a}"));
        let frame_b = self.stable_frame(b).unwrap_or_else(|| panic!("unknown frame: {b}"));

        let mut diff = FrameDiff::default();
        for (object_id, snapshot_id) in frame_a.entries() {
            match frame_b.snapshot_id_of(object_id) {
                None => diff.removed.push(object_id),
                Some(other) if other != snapshot_id => diff.changed.push(object_id),
                Some(_) => {}
            }
        }
        for object_id in frame_b.object_ids() {
            if !frame_a.contains_object(object_id) {
                diff.added.push(object_id);
            }
        }
        diff.added.sort();
        diff.removed.sort();
        diff.changed.sort();
        diff
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use stratum_metamodel::{Metamodel, ObjectType, StructuralKind};

    use super::*;

    #[test]
    fn diff_reports_additions_removals_and_changes() {
        let ty = Arc::new(ObjectType::new("Thing", StructuralKind::Unstructured));
        let mut mem = Memory::new(Metamodel::new()).unwrap();

        let frame0 = mem.create_frame(None);
        let kept = mem.create(frame0, ty.clone(), HashMap::new(), None).unwrap();
        let mutated = mem.create(frame0, ty.clone(), HashMap::new(), None).unwrap();
        let removed = mem.create(frame0, ty.clone(), HashMap::new(), None).unwrap();
        let v0 = mem.accept(frame0, true).unwrap();

        let frame1 = mem.derive_frame(Some(v0), None);
        mem.remove_cascading(frame1, removed);
        mem.mutable_object(frame1, mutated);
        let added = mem.create(frame1, ty, HashMap::new(), None).unwrap();
        let v1 = mem.accept(frame1, true).unwrap();

        let diff = mem.diff_frames(v0, v1);
        assert_eq!(diff.added, vec![added]);
        assert_eq!(diff.removed, vec![removed]);
        assert_eq!(diff.changed, vec![mutated]);
        assert!(!diff.changed.contains(&kept));
    }
}
