//! Bridges the concrete snapshot/frame types to the metamodel's
//! `ObjectView`/`FrameView` traits, so predicates, requirements, and
//! constraints can run over real memory state without the metamodel crate
//! ever depending on this one.

use stratum_metamodel::{FrameView, ObjectView, StructuralKind};
use stratum_value::{ObjectId, Variant};

use crate::frame::{MutableFrame, StableFrame};
use crate::memory::Memory;
use crate::snapshot::ObjectSnapshot;

impl ObjectView for ObjectSnapshot {
    fn id(&self) -> ObjectId {
        self.object_id
    }

    fn type_name(&self) -> &str {
        self.object_type.name()
    }

    fn has_trait(&self, trait_name: &str) -> bool {
        self.object_type.has_trait(trait_name)
    }

    fn structural_kind(&self) -> StructuralKind {
        self.structure.structural_kind()
    }

    fn origin(&self) -> Option<ObjectId> {
        self.structure.origin()
    }

    fn target(&self) -> Option<ObjectId> {
        self.structure.target()
    }

    fn attribute(&self, name: &str) -> Option<&Variant> {
        self.attribute(name)
    }
}

/// A read-only view of a mutable frame's current objects, resolved against
/// the memory that owns its snapshots. Entries marked removed are excluded,
/// matching the frame's effective membership.
pub struct MutableFrameView<'a> {
    memory: &'a Memory,
    frame: &'a MutableFrame,
}

impl<'a> MutableFrameView<'a> {
    pub fn new(memory: &'a Memory, frame: &'a MutableFrame) -> Self {
        Self { memory, frame }
    }
}

impl<'a> FrameView for MutableFrameView<'a> {
    fn objects(&self) -> Vec<&dyn ObjectView> {
        self.frame
            .entries
            .iter()
            .filter(|(id, _)| !self.frame.removed_objects.contains(id))
            .map(|(_, entry)| self.memory.snapshot(entry.snapshot_id) as &dyn ObjectView)
            .collect()
    }
}

pub struct StableFrameView<'a> {
    memory: &'a Memory,
    frame: &'a StableFrame,
}

impl<'a> StableFrameView<'a> {
    pub fn new(memory: &'a Memory, frame: &'a StableFrame) -> Self {
        Self { memory, frame }
    }
}

impl<'a> FrameView for StableFrameView<'a> {
    fn objects(&self) -> Vec<&dyn ObjectView> {
        self.frame
            .entries
            .values()
            .map(|snapshot_id| self.memory.snapshot(*snapshot_id) as &dyn ObjectView)
            .collect()
    }
}

impl Memory {
    pub fn view_mutable_frame(&self, id: stratum_value::FrameId) -> Option<MutableFrameView<'_>> {
        self.mutable_frame(id).map(|frame| MutableFrameView::new(self, frame))
    }

    pub fn view_stable_frame(&self, id: stratum_value::FrameId) -> Option<StableFrameView<'_>> {
        self.stable_frame(id).map(|frame| StableFrameView::new(self, frame))
    }
}
