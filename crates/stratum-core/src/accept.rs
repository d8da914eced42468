//! Frame acceptance: the referential-integrity, type-checking, and
//! constraint passes a mutable frame must clear before it is promoted to a
//! stable, history-eligible frame.

use std::collections::{HashMap, HashSet};

use stratum_value::{FrameId, ObjectId};
use tracing::{debug, trace};

use crate::error::{FrameValidationError, TypeError, TypeErrorKind};
use crate::frame::{FrameState, Ownership, StableFrame};
use crate::memory::Memory;
use crate::view_impl::MutableFrameView;

impl Memory {
    /// Validate and promote an open mutable frame to a stable frame.
    ///
    /// Runs, in order: referential integrity (every structural reference
    /// resolves within the frame), type checking (every declared attribute
    /// is present with the right value kind), and constraint checking. If
    /// any pass reports a problem the frame is left open, untouched, and
    /// the accumulated errors are returned. Otherwise every owned snapshot
    /// is marked validated, the frame is moved into the stable table, and
    /// — when `append_to_history` is set — it becomes the new current
    /// frame with the previous one pushed onto the undo stack and the redo
    /// stack cleared.
    ///
    /// Panics if `frame_id` does not name an open mutable frame.
    pub fn accept(&mut self, frame_id: FrameId, append_to_history: bool) -> Result<FrameId, FrameValidationError> {
        let live_objects: HashMap<ObjectId, stratum_value::SnapshotId> = {
            let frame = self
                .mutable_frame(frame_id)
                .unwrap_or_else(|| panic!("unknown frame: {frame_id}"));
            frame
                .entries()
                .filter(|(id, _)| !frame.removed_objects.contains(id))
                .map(|(id, entry)| (id, entry.snapshot_id))
                .collect()
        };

        let mut error = FrameValidationError::default();
        error.broken_references = self.check_referential_integrity(&live_objects);
        error.type_errors = self.check_types(&live_objects);
        if error.broken_references.is_empty() && error.type_errors.is_empty() {
            error.violations = self.check_constraints(frame_id);
        }

        if !error.is_empty() {
            debug!(%frame_id, errors = ?error, "accept: validation failed");
            return Err(error);
        }

        self.promote(frame_id, live_objects, append_to_history);
        Ok(frame_id)
    }

    fn check_referential_integrity(
        &self,
        live_objects: &HashMap<ObjectId, stratum_value::SnapshotId>,
    ) -> Vec<ObjectId> {
        let mut broken = HashSet::new();
        for (&object_id, &snapshot_id) in live_objects {
            let snapshot = self.snapshot(snapshot_id);
            for reference in snapshot.structural_references() {
                if !live_objects.contains_key(&reference) {
                    broken.insert(object_id);
                }
            }
        }
        let mut broken: Vec<ObjectId> = broken.into_iter().collect();
        broken.sort();
        broken
    }

    fn check_types(&self, live_objects: &HashMap<ObjectId, stratum_value::SnapshotId>) -> Vec<TypeError> {
        let mut errors = Vec::new();
        let mut ids: Vec<&ObjectId> = live_objects.keys().collect();
        ids.sort();
        for object_id in ids {
            let snapshot_id = live_objects[object_id];
            let snapshot = self.snapshot(snapshot_id);
            let descriptors = snapshot
                .object_type
                .attributes()
                .unwrap_or_else(|err| panic!("metamodel bound to this memory is invalid: {err}"));
            for descriptor in descriptors {
                match snapshot.attribute(&descriptor.name) {
                    None if descriptor.default.is_none() => errors.push(TypeError {
                        object: *object_id,
                        attribute: descriptor.name.clone(),
                        kind: TypeErrorKind::Missing,
                    }),
                    None => {}
                    Some(value) if value.value_type() != descriptor.value_type => errors.push(TypeError {
                        object: *object_id,
                        attribute: descriptor.name.clone(),
                        kind: TypeErrorKind::WrongType {
                            expected: descriptor.value_type,
                            got: value.value_type(),
                        },
                    }),
                    Some(_) => {}
                }
            }
        }
        errors
    }

    fn check_constraints(&self, frame_id: FrameId) -> Vec<stratum_metamodel::ConstraintViolation> {
        let view = MutableFrameView::new(self, self.mutable_frame(frame_id).expect("checked above"));
        self.metamodel()
            .constraints()
            .iter()
            .filter_map(|constraint| constraint.check(&view))
            .collect()
    }

    fn promote(
        &mut self,
        frame_id: FrameId,
        live_objects: HashMap<ObjectId, stratum_value::SnapshotId>,
        append_to_history: bool,
    ) {
        let frame = self.mutable_frames_mut().remove(&frame_id).expect("checked above");
        for entry in frame.entries.values() {
            if entry.ownership == Ownership::Owned {
                self.snapshot_mut(entry.snapshot_id).state = crate::snapshot::SnapshotState::Validated;
            }
        }
        debug_assert_eq!(frame.state, FrameState::Open);

        let stable = StableFrame {
            id: frame_id,
            entries: live_objects,
        };
        self.stable_frames_mut().insert(frame_id, stable);

        if append_to_history {
            if let Some(previous) = self.current_frame_id() {
                self.undo_stack_mut().push(previous);
            }
            self.redo_stack_mut().clear();
        }
        self.set_current_frame(frame_id);
        trace!(%frame_id, append_to_history, "accept: promoted");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use stratum_metamodel::{AttributeDescriptor, Constraint, Metamodel, ObjectType, Predicate, Requirement, StructuralKind, Trait};
    use stratum_value::{AtomType, ValueType, Variant};

    use crate::snapshot::SnapshotState;

    use super::*;

    fn memory_with_unique_name_constraint() -> (Memory, Arc<ObjectType>) {
        let named = Trait::new("Named")
            .with_attribute(AttributeDescriptor::new("name", ValueType::Atom(AtomType::String)));
        let ty = ObjectType::new("Item", StructuralKind::Unstructured).with_trait(named);
        let mm = Metamodel::new().with_type(ty.clone()).with_constraint(Constraint::new(
            "unique-name",
            Predicate::IsType("Item".into()),
            Requirement::UniqueAttribute("name".into()),
        ));
        (Memory::new(mm).unwrap(), Arc::new(ty))
    }

    #[test]
    fn accept_promotes_a_clean_frame() {
        let (mut mem, ty) = memory_with_unique_name_constraint();
        let frame_id = mem.create_frame(None);

        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Variant::string("a"));
        let snap = mem
            .create_snapshot(ty, None, None, attrs, None, SnapshotState::Transient)
            .unwrap();
        let object_id = mem.snapshot(snap).object_id;
        mem.insert_owned(frame_id, object_id, snap);

        let result = mem.accept(frame_id, true);
        assert!(result.is_ok());
        assert_eq!(mem.current_frame_id(), Some(frame_id));
    }

    #[test]
    fn accept_rejects_a_duplicate_attribute_value() {
        let (mut mem, ty) = memory_with_unique_name_constraint();
        let frame_id = mem.create_frame(None);

        for _ in 0..2 {
            let mut attrs = HashMap::new();
            attrs.insert("name".to_string(), Variant::string("dup"));
            let snap = mem
                .create_snapshot(ty.clone(), None, None, attrs, None, SnapshotState::Transient)
                .unwrap();
            let object_id = mem.snapshot(snap).object_id;
            mem.insert_owned(frame_id, object_id, snap);
        }

        let result = mem.accept(frame_id, true);
        assert!(result.is_err());
        assert!(mem.mutable_frame(frame_id).is_some(), "frame stays open on rejection");
    }

    #[test]
    fn accept_rejects_a_dangling_edge_endpoint() {
        let (mut mem, ty) = memory_with_unique_name_constraint();
        let edge_ty = Arc::new(ObjectType::new("Edge", StructuralKind::Edge));
        let frame_id = mem.create_frame(None);

        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Variant::string("only-node"));
        let node_snap = mem
            .create_snapshot(ty, None, None, attrs, None, SnapshotState::Transient)
            .unwrap();
        let node_id = mem.snapshot(node_snap).object_id;
        mem.insert_owned(frame_id, node_id, node_snap);

        let missing_target = stratum_value::ObjectId::new(99_999);
        let edge_snap = mem
            .create_snapshot(
                edge_ty,
                None,
                None,
                HashMap::new(),
                Some(crate::snapshot::StructuralComponent::Edge {
                    origin: node_id,
                    target: missing_target,
                }),
                SnapshotState::Transient,
            )
            .unwrap();
        let edge_id = mem.snapshot(edge_snap).object_id;
        mem.insert_owned(frame_id, edge_id, edge_snap);

        let result = mem.accept(frame_id, true).unwrap_err();
        assert_eq!(result.broken_references, vec![edge_id]);
    }
}
