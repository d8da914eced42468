//! Mutation operations over an open mutable frame: inserting objects,
//! creating new ones, copy-on-write promotion, cascading removal, and the
//! parent/child hierarchy operations.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use stratum_metamodel::ObjectType;
use stratum_value::{FrameId, ObjectId, SnapshotId, Variant};
use tracing::trace;

use crate::error::CoreError;
use crate::frame::{FrameEntry, FrameState, Ownership};
use crate::memory::Memory;
use crate::snapshot::{SnapshotState, StructuralComponent};

impl Memory {
    /// Associate an object with a snapshot this frame owns (may mutate it
    /// freely without affecting any other frame).
    ///
    /// Panics if the frame is not open, if the snapshot is uninitialized or
    /// already validated, or if `object_id`/`snapshot_id` is already present
    /// in the frame.
    pub fn insert_owned(&mut self, frame_id: FrameId, object_id: ObjectId, snapshot_id: SnapshotId) {
        self.check_insert_preconditions(frame_id, object_id, snapshot_id);
        let state = self.snapshot(snapshot_id).state;
        assert_ne!(
            state,
            SnapshotState::Validated,
            "snapshot {snapshot_id} is validated; cannot insert it as owned into frame {frame_id}"
        );
        self.mutable_frame_mut(frame_id).entries.insert(
            object_id,
            FrameEntry {
                snapshot_id,
                ownership: Ownership::Owned,
            },
        );
    }

    /// Associate an object with a snapshot this frame only reads (shared
    /// with whatever frame it came from, until mutated via
    /// [`Memory::mutable_object`]).
    ///
    /// Panics if the frame is not open, if the snapshot is uninitialized or
    /// not yet validated, or if `object_id`/`snapshot_id` is already present
    /// in the frame.
    pub fn insert_borrowed(&mut self, frame_id: FrameId, object_id: ObjectId, snapshot_id: SnapshotId) {
        self.check_insert_preconditions(frame_id, object_id, snapshot_id);
        let state = self.snapshot(snapshot_id).state;
        assert_eq!(
            state,
            SnapshotState::Validated,
            "snapshot {snapshot_id} is not validated; cannot insert it as borrowed into frame {frame_id}"
        );
        self.mutable_frame_mut(frame_id).entries.insert(
            object_id,
            FrameEntry {
                snapshot_id,
                ownership: Ownership::Borrowed,
            },
        );
    }

    fn check_insert_preconditions(&self, frame_id: FrameId, object_id: ObjectId, snapshot_id: SnapshotId) {
        let frame = self
            .mutable_frame(frame_id)
            .unwrap_or_else(|| panic!("unknown frame: {frame_id}"));
        assert_eq!(
            frame.state,
            FrameState::Open,
            "frame {frame_id} is not open; cannot insert into it"
        );
        assert!(
            !frame.contains_object(object_id),
            "frame {frame_id} already has an entry for object {object_id}"
        );
        assert!(
            !frame.entries().any(|(_, entry)| entry.snapshot_id == snapshot_id),
            "frame {frame_id} already contains snapshot {snapshot_id}"
        );
        assert_ne!(
            self.snapshot(snapshot_id).state,
            SnapshotState::Uninitialized,
            "snapshot {snapshot_id} is uninitialized; cannot insert it into frame {frame_id}"
        );
    }

    /// Allocate a brand-new object and snapshot and insert it into `frame_id`
    /// as owned.
    pub fn create(
        &mut self,
        frame_id: FrameId,
        object_type: Arc<ObjectType>,
        attributes: std::collections::HashMap<String, Variant>,
        structure: Option<StructuralComponent>,
    ) -> Result<ObjectId, CoreError> {
        let snapshot_id = self.create_snapshot(object_type, None, None, attributes, structure, SnapshotState::Transient)?;
        let object_id = self.snapshot(snapshot_id).object_id;
        self.insert_owned(frame_id, object_id, snapshot_id);
        trace!(%frame_id, %object_id, "create");
        Ok(object_id)
    }

    /// Return a snapshot id this frame owns for `object_id`, deriving a
    /// fresh one via copy-on-write if the frame currently only borrows it.
    ///
    /// Panics if `object_id` is not present in `frame_id`.
    pub fn mutable_object(&mut self, frame_id: FrameId, object_id: ObjectId) -> SnapshotId {
        let entry = self
            .mutable_frame(frame_id)
            .and_then(|frame| frame.entry(object_id))
            .unwrap_or_else(|| panic!("frame {frame_id} has no object {object_id}"));

        match entry.ownership {
            Ownership::Owned => entry.snapshot_id,
            Ownership::Borrowed => {
                let new_snapshot_id = self.derive_snapshot(entry.snapshot_id);
                self.mutable_frame_mut(frame_id).entries.insert(
                    object_id,
                    FrameEntry {
                        snapshot_id: new_snapshot_id,
                        ownership: Ownership::Owned,
                    },
                );
                trace!(%frame_id, %object_id, %new_snapshot_id, "mutable_object: copy-on-write");
                new_snapshot_id
            }
        }
    }

    /// Mark `object_id` and everything structurally dependent on it
    /// (hierarchy descendants, and any other live object whose edge
    /// endpoints or parent reference one of those) as removed from
    /// `frame_id`. Removed objects stay in the frame's entry table (so
    /// undo-free inspection still works) but are excluded from acceptance
    /// and from any [`FrameView`](stratum_metamodel::FrameView) built over
    /// the frame.
    pub fn remove_cascading(&mut self, frame_id: FrameId, object_id: ObjectId) {
        let mut to_remove = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(object_id);
        while let Some(id) = queue.pop_front() {
            if !to_remove.insert(id) {
                continue;
            }
            if let Some(entry) = self.mutable_frame(frame_id).and_then(|f| f.entry(id)) {
                let snapshot = self.snapshot(entry.snapshot_id);
                queue.extend(snapshot.children.iter().copied());
            }
        }

        loop {
            let mut newly_dependent = Vec::new();
            if let Some(frame) = self.mutable_frame(frame_id) {
                for (id, entry) in frame.entries() {
                    if to_remove.contains(&id) || frame.removed_objects.contains(&id) {
                        continue;
                    }
                    let snapshot = self.snapshot(entry.snapshot_id);
                    if snapshot.structural_references().iter().any(|r| to_remove.contains(r)) {
                        newly_dependent.push(id);
                    }
                }
            }
            if newly_dependent.is_empty() {
                break;
            }
            to_remove.extend(newly_dependent);
        }

        trace!(%frame_id, %object_id, removed = to_remove.len(), "remove_cascading");
        let frame = self.mutable_frame_mut(frame_id);
        frame.removed_objects.extend(to_remove);
    }

    /// Add `child_id` as a hierarchy child of `parent_id`, updating both
    /// sides (copy-on-write promotes either snapshot as needed).
    pub fn add_child(&mut self, frame_id: FrameId, parent_id: ObjectId, child_id: ObjectId) {
        let parent_snapshot = self.mutable_object(frame_id, parent_id);
        self.snapshot_mut(parent_snapshot).children.insert(child_id);

        let child_snapshot = self.mutable_object(frame_id, child_id);
        self.snapshot_mut(child_snapshot).parent = Some(parent_id);
    }

    /// Detach `child_id` from `parent_id`'s children, and clear the
    /// child's parent link if it currently points at `parent_id`.
    pub fn remove_child(&mut self, frame_id: FrameId, parent_id: ObjectId, child_id: ObjectId) {
        let parent_snapshot = self.mutable_object(frame_id, parent_id);
        self.snapshot_mut(parent_snapshot).children.remove(&child_id);

        let child_snapshot = self.mutable_object(frame_id, child_id);
        let child = self.snapshot_mut(child_snapshot);
        if child.parent == Some(parent_id) {
            child.parent = None;
        }
    }

    /// Move `child_id` to a new parent, detaching it from any previous one.
    pub fn set_parent(&mut self, frame_id: FrameId, child_id: ObjectId, new_parent_id: ObjectId) {
        let current_parent = {
            let entry = self
                .mutable_frame(frame_id)
                .and_then(|f| f.entry(child_id))
                .unwrap_or_else(|| panic!("frame {frame_id} has no object {child_id}"));
            self.snapshot(entry.snapshot_id).parent
        };
        if let Some(previous) = current_parent {
            if previous != new_parent_id {
                self.remove_child(frame_id, previous, child_id);
            }
        }
        self.add_child(frame_id, new_parent_id, child_id);
    }

    /// Detach `child_id` from its current parent, if it has one.
    pub fn remove_from_parent(&mut self, frame_id: FrameId, child_id: ObjectId) {
        let current_parent = {
            let entry = self
                .mutable_frame(frame_id)
                .and_then(|f| f.entry(child_id))
                .unwrap_or_else(|| panic!("frame {frame_id} has no object {child_id}"));
            self.snapshot(entry.snapshot_id).parent
        };
        if let Some(parent_id) = current_parent {
            self.remove_child(frame_id, parent_id, child_id);
        }
    }
}
