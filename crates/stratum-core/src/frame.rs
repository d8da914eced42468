use std::collections::{HashMap, HashSet};

use stratum_value::{FrameId, ObjectId, SnapshotId};

/// A mutable frame's per-entry provenance: whether the frame may mutate the
/// snapshot (owned) or has only inherited it read-only from a parent stable
/// frame (borrowed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owned,
    Borrowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEntry {
    pub snapshot_id: SnapshotId,
    pub ownership: Ownership,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Open,
    Validated,
}

/// A frame under construction.
#[derive(Debug, Clone)]
pub struct MutableFrame {
    pub id: FrameId,
    pub(crate) entries: HashMap<ObjectId, FrameEntry>,
    pub removed_objects: HashSet<ObjectId>,
    pub state: FrameState,
}

impl MutableFrame {
    pub fn new(id: FrameId) -> Self {
        Self {
            id,
            entries: HashMap::new(),
            removed_objects: HashSet::new(),
            state: FrameState::Open,
        }
    }

    pub fn contains_object(&self, id: ObjectId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn entry(&self, id: ObjectId) -> Option<FrameEntry> {
        self.entries.get(&id).copied()
    }

    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.entries.keys().copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (ObjectId, FrameEntry)> + '_ {
        self.entries.iter().map(|(id, entry)| (*id, *entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A validated, immutable frame eligible for history.
#[derive(Debug, Clone)]
pub struct StableFrame {
    pub id: FrameId,
    pub(crate) entries: HashMap<ObjectId, SnapshotId>,
}

impl StableFrame {
    pub fn contains_object(&self, id: ObjectId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn snapshot_id_of(&self, id: ObjectId) -> Option<SnapshotId> {
        self.entries.get(&id).copied()
    }

    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.entries.keys().copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (ObjectId, SnapshotId)> + '_ {
        self.entries.iter().map(|(id, snap)| (*id, *snap))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
