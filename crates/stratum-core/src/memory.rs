use std::collections::HashMap;
use std::sync::Arc;

use stratum_metamodel::{Metamodel, MetamodelError, ObjectType, StructuralKind};
use stratum_value::{FrameId, ObjectId, SnapshotId, Variant};
use tracing::trace;

use crate::error::CoreError;
use crate::frame::{FrameEntry, FrameState, MutableFrame, Ownership, StableFrame};
use crate::id_alloc::IdAllocator;
use crate::snapshot::{ObjectSnapshot, SnapshotState, StructuralComponent};

/// Owns every piece of state the object memory manages: identity
/// allocation, the snapshot table, open and validated frames, and undo/redo
/// history. A `Memory` is bound to exactly one metamodel for its lifetime;
/// there is no rebind operation.
pub struct Memory {
    metamodel: Metamodel,
    allocator: IdAllocator,
    snapshots: HashMap<SnapshotId, ObjectSnapshot>,
    mutable_frames: HashMap<FrameId, MutableFrame>,
    stable_frames: HashMap<FrameId, StableFrame>,
    current_frame: Option<FrameId>,
    undo_stack: Vec<FrameId>,
    redo_stack: Vec<FrameId>,
}

impl Memory {
    /// Bind a validated metamodel and start with empty state.
    pub fn new(metamodel: Metamodel) -> Result<Self, Vec<MetamodelError>> {
        metamodel.validate()?;
        Ok(Self {
            metamodel,
            allocator: IdAllocator::new(),
            snapshots: HashMap::new(),
            mutable_frames: HashMap::new(),
            stable_frames: HashMap::new(),
            current_frame: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        })
    }

    pub fn metamodel(&self) -> &Metamodel {
        &self.metamodel
    }

    pub fn current_frame_id(&self) -> Option<FrameId> {
        self.current_frame
    }

    // -- identity allocation --------------------------------------------

    pub fn allocate_object_id(&mut self, required: Option<ObjectId>) -> ObjectId {
        ObjectId::new(self.allocator.allocate(required.map(ObjectId::get)))
    }

    pub fn allocate_snapshot_id(&mut self, required: Option<SnapshotId>) -> SnapshotId {
        SnapshotId::new(self.allocator.allocate(required.map(SnapshotId::get)))
    }

    pub fn allocate_frame_id(&mut self, required: Option<FrameId>) -> FrameId {
        FrameId::new(self.allocator.allocate(required.map(FrameId::get)))
    }

    // -- snapshots --------------------------------------------------------

    /// Assemble a new snapshot for an object of `object_type`, applying
    /// trait-declared attribute defaults for any attribute the caller left
    /// unset. Validates only the structural payload against the type's
    /// structural kind; attribute type-checking happens at frame
    /// acceptance, not here.
    #[allow(clippy::too_many_arguments)]
    pub fn create_snapshot(
        &mut self,
        object_type: Arc<ObjectType>,
        object_id: Option<ObjectId>,
        snapshot_id: Option<SnapshotId>,
        mut attributes: HashMap<String, Variant>,
        structure: Option<StructuralComponent>,
        state: SnapshotState,
    ) -> Result<SnapshotId, CoreError> {
        let structure = resolve_structure(&object_type, structure)?;

        let descriptors = object_type
            .attributes()
            .unwrap_or_else(|err| panic!("metamodel bound to this memory is invalid: {err}"));
        for descriptor in descriptors {
            if !attributes.contains_key(&descriptor.name) {
                if let Some(default) = &descriptor.default {
                    attributes.insert(descriptor.name.clone(), default.clone());
                }
            }
        }

        let object_id = self.allocate_object_id(object_id);
        let snapshot_id = self.allocate_snapshot_id(snapshot_id);

        trace!(%object_id, %snapshot_id, type_name = object_type.name(), "create_snapshot");

        self.snapshots.insert(
            snapshot_id,
            ObjectSnapshot {
                object_id,
                snapshot_id,
                object_type,
                structure,
                attributes,
                parent: None,
                children: Default::default(),
                state,
            },
        );
        Ok(snapshot_id)
    }

    /// Produce and store a fresh snapshot copying an existing one under a
    /// new id (the copy-on-write primitive everything else builds on).
    pub fn derive_snapshot(&mut self, origin: SnapshotId) -> SnapshotId {
        let new_id = self.allocate_snapshot_id(None);
        let derived = self.snapshot(origin).derive(new_id);
        trace!(%origin, new_snapshot_id = %new_id, "derive_snapshot");
        self.snapshots.insert(new_id, derived);
        new_id
    }

    /// Look up a snapshot by id.
    ///
    /// Panics if the id is unknown: referencing a snapshot that was never
    /// allocated in this memory is a programming error.
    pub fn snapshot(&self, id: SnapshotId) -> &ObjectSnapshot {
        self.snapshots
            .get(&id)
            .unwrap_or_else(|| panic!("unknown snapshot: {id}"))
    }

    pub(crate) fn snapshot_mut(&mut self, id: SnapshotId) -> &mut ObjectSnapshot {
        self.snapshots
            .get_mut(&id)
            .unwrap_or_else(|| panic!("unknown snapshot: {id}"))
    }

    pub fn contains_snapshot(&self, id: SnapshotId) -> bool {
        self.snapshots.contains_key(&id)
    }

    // -- frames -------------------------------------------------------------

    /// Open a brand-new, empty mutable frame.
    pub fn create_frame(&mut self, id: Option<FrameId>) -> FrameId {
        let id = self.allocate_frame_id(id);
        trace!(%id, "create_frame");
        self.mutable_frames.insert(id, MutableFrame::new(id));
        id
    }

    /// Open a mutable frame copying a stable frame's object table as
    /// borrowed entries, ready for copy-on-write mutation. Defaults to
    /// deriving from the current frame when `original_frame_id` is `None`.
    ///
    /// Panics if the source names a frame id unknown to this memory.
    pub fn derive_frame(&mut self, original_frame_id: Option<FrameId>, id: Option<FrameId>) -> FrameId {
        let source_id = original_frame_id.or(self.current_frame);
        let entries = match source_id {
            Some(source_id) => {
                let source = self
                    .stable_frames
                    .get(&source_id)
                    .unwrap_or_else(|| panic!("unknown frame: {source_id}"));
                source
                    .entries()
                    .map(|(object_id, snapshot_id)| {
                        (
                            object_id,
                            FrameEntry {
                                snapshot_id,
                                ownership: Ownership::Borrowed,
                            },
                        )
                    })
                    .collect()
            }
            None => HashMap::new(),
        };

        let new_id = self.allocate_frame_id(id);
        trace!(%new_id, source = ?source_id, "derive_frame");
        self.mutable_frames.insert(
            new_id,
            MutableFrame {
                id: new_id,
                entries,
                removed_objects: Default::default(),
                state: FrameState::Open,
            },
        );
        new_id
    }

    pub fn contains_frame(&self, id: FrameId) -> bool {
        self.mutable_frames.contains_key(&id) || self.stable_frames.contains_key(&id)
    }

    pub fn mutable_frame(&self, id: FrameId) -> Option<&MutableFrame> {
        self.mutable_frames.get(&id)
    }

    pub(crate) fn mutable_frame_mut(&mut self, id: FrameId) -> &mut MutableFrame {
        self.mutable_frames
            .get_mut(&id)
            .unwrap_or_else(|| panic!("unknown frame: {id}"))
    }

    pub fn stable_frame(&self, id: FrameId) -> Option<&StableFrame> {
        self.stable_frames.get(&id)
    }

    pub(crate) fn stable_frames_mut(&mut self) -> &mut HashMap<FrameId, StableFrame> {
        &mut self.stable_frames
    }

    pub(crate) fn mutable_frames_mut(&mut self) -> &mut HashMap<FrameId, MutableFrame> {
        &mut self.mutable_frames
    }

    pub(crate) fn snapshots_map(&self) -> &HashMap<SnapshotId, ObjectSnapshot> {
        &self.snapshots
    }

    pub(crate) fn set_current_frame(&mut self, id: FrameId) {
        self.current_frame = Some(id);
    }

    pub(crate) fn undo_stack_mut(&mut self) -> &mut Vec<FrameId> {
        &mut self.undo_stack
    }

    pub(crate) fn redo_stack_mut(&mut self) -> &mut Vec<FrameId> {
        &mut self.redo_stack
    }

    pub(crate) fn undo_stack(&self) -> &[FrameId] {
        &self.undo_stack
    }

    pub(crate) fn redo_stack(&self) -> &[FrameId] {
        &self.redo_stack
    }

    /// Discard an open mutable frame, releasing any snapshot it owns that no
    /// other frame still references.
    ///
    /// Panics if the id is not an open frame.
    pub fn discard(&mut self, id: FrameId) {
        let frame = self
            .mutable_frames
            .remove(&id)
            .unwrap_or_else(|| panic!("unknown frame: {id}"));
        trace!(%id, "discard");
        for entry in frame.entries.values() {
            if entry.ownership == Ownership::Owned && !self.snapshot_referenced_elsewhere(entry.snapshot_id, id) {
                self.snapshots.remove(&entry.snapshot_id);
            }
        }
    }

    /// Remove a validated, non-current stable frame from memory.
    ///
    /// Panics if `id` is the current frame (removing live state) or is not
    /// a known stable frame.
    pub fn remove_frame(&mut self, id: FrameId) {
        if self.current_frame == Some(id) {
            panic!("cannot remove the current frame: {id}");
        }
        if self.stable_frames.remove(&id).is_none() {
            panic!("unknown frame: {id}");
        }
        self.undo_stack.retain(|f| *f != id);
        self.redo_stack.retain(|f| *f != id);
    }

    fn snapshot_referenced_elsewhere(&self, snapshot_id: SnapshotId, excluding_frame: FrameId) -> bool {
        let in_mutable = self
            .mutable_frames
            .iter()
            .filter(|(frame_id, _)| **frame_id != excluding_frame)
            .any(|(_, frame)| frame.entries.values().any(|e| e.snapshot_id == snapshot_id));
        let in_stable = self
            .stable_frames
            .values()
            .any(|frame| frame.entries.values().any(|s| *s == snapshot_id));
        in_mutable || in_stable
    }
}

fn resolve_structure(
    object_type: &ObjectType,
    structure: Option<StructuralComponent>,
) -> Result<StructuralComponent, CoreError> {
    match (object_type.structural_kind(), structure) {
        (StructuralKind::Edge, Some(s @ StructuralComponent::Edge { .. })) => Ok(s),
        (StructuralKind::Edge, None) => Err(CoreError::MissingEdgeEndpoints {
            type_name: object_type.name().to_string(),
        }),
        (StructuralKind::Edge, Some(_)) => Err(CoreError::StructuralKindMismatch {
            type_name: object_type.name().to_string(),
            expected: StructuralKind::Edge,
        }),
        (StructuralKind::Node, None) => Ok(StructuralComponent::Node),
        (StructuralKind::Node, Some(s @ StructuralComponent::Node)) => Ok(s),
        (StructuralKind::Node, Some(_)) => Err(CoreError::StructuralKindMismatch {
            type_name: object_type.name().to_string(),
            expected: StructuralKind::Node,
        }),
        (StructuralKind::Unstructured, None) => Ok(StructuralComponent::Unstructured),
        (StructuralKind::Unstructured, Some(s @ StructuralComponent::Unstructured)) => Ok(s),
        (StructuralKind::Unstructured, Some(_)) => Err(CoreError::StructuralKindMismatch {
            type_name: object_type.name().to_string(),
            expected: StructuralKind::Unstructured,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_metamodel::ObjectType;

    fn empty_memory() -> Memory {
        Memory::new(Metamodel::new()).unwrap()
    }

    #[test]
    fn create_snapshot_applies_trait_defaults() {
        use stratum_metamodel::{AttributeDescriptor, Trait};
        use stratum_value::{AtomType, ValueType};

        let counted = Trait::new("Counted").with_attribute(
            AttributeDescriptor::new("count", ValueType::Atom(AtomType::Int))
                .with_default(Variant::int(0)),
        );
        let ty = Arc::new(
            ObjectType::new("Counter", StructuralKind::Unstructured).with_trait(counted),
        );

        let mut mem = empty_memory();
        let snap_id = mem
            .create_snapshot(ty, None, None, HashMap::new(), None, SnapshotState::Transient)
            .unwrap();
        assert_eq!(mem.snapshot(snap_id).attribute_as_int("count"), Some(0));
    }

    #[test]
    fn edge_type_without_endpoints_is_rejected() {
        let ty = Arc::new(ObjectType::new("Link", StructuralKind::Edge));
        let mut mem = empty_memory();
        let result = mem.create_snapshot(ty, None, None, HashMap::new(), None, SnapshotState::Transient);
        assert!(matches!(result, Err(CoreError::MissingEdgeEndpoints { .. })));
    }

    #[test]
    fn derive_frame_borrows_every_entry_from_the_source() {
        let ty = Arc::new(ObjectType::new("Thing", StructuralKind::Unstructured));
        let mut mem = empty_memory();
        let snap = mem
            .create_snapshot(ty, None, None, HashMap::new(), None, SnapshotState::Validated)
            .unwrap();
        let object_id = mem.snapshot(snap).object_id;

        let mut entries = HashMap::new();
        entries.insert(object_id, snap);
        let frame_id = mem.allocate_frame_id(None);
        mem.stable_frames_mut().insert(frame_id, StableFrame { id: frame_id, entries });

        let derived = mem.derive_frame(Some(frame_id), None);
        let entry = mem.mutable_frame(derived).unwrap().entry(object_id).unwrap();
        assert_eq!(entry.ownership, Ownership::Borrowed);
        assert_eq!(entry.snapshot_id, snap);
    }

    #[test]
    #[should_panic(expected = "unknown frame")]
    fn deriving_from_an_unknown_frame_panics() {
        let mut mem = empty_memory();
        mem.derive_frame(Some(FrameId::new(999)), None);
    }
}
