use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use stratum_metamodel::{ObjectType, StructuralKind};
use stratum_value::{ObjectId, SnapshotId, Variant};

/// The structural payload of one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralComponent {
    Unstructured,
    Node,
    Edge { origin: ObjectId, target: ObjectId },
}

impl StructuralComponent {
    pub fn structural_kind(&self) -> StructuralKind {
        match self {
            StructuralComponent::Unstructured => StructuralKind::Unstructured,
            StructuralComponent::Node => StructuralKind::Node,
            StructuralComponent::Edge { .. } => StructuralKind::Edge,
        }
    }

    pub fn origin(&self) -> Option<ObjectId> {
        match self {
            StructuralComponent::Edge { origin, .. } => Some(*origin),
            _ => None,
        }
    }

    pub fn target(&self) -> Option<ObjectId> {
        match self {
            StructuralComponent::Edge { target, .. } => Some(*target),
            _ => None,
        }
    }
}

/// A snapshot's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotState {
    Uninitialized,
    Transient,
    Validated,
}

/// One immutable-after-validation version of one object.
#[derive(Debug, Clone)]
pub struct ObjectSnapshot {
    pub object_id: ObjectId,
    pub snapshot_id: SnapshotId,
    pub object_type: Arc<ObjectType>,
    pub structure: StructuralComponent,
    pub attributes: HashMap<String, Variant>,
    pub parent: Option<ObjectId>,
    pub children: HashSet<ObjectId>,
    pub state: SnapshotState,
}

impl ObjectSnapshot {
    pub fn attribute(&self, name: &str) -> Option<&Variant> {
        self.attributes.get(name)
    }

    pub fn attribute_as_int(&self, name: &str) -> Option<i64> {
        self.attribute(name)?.to_int().ok()
    }

    pub fn attribute_as_double(&self, name: &str) -> Option<f64> {
        self.attribute(name)?.to_double().ok()
    }

    pub fn attribute_as_bool(&self, name: &str) -> Option<bool> {
        self.attribute(name)?.to_bool().ok()
    }

    pub fn attribute_as_str(&self, name: &str) -> Option<&str> {
        match self.attribute(name)? {
            Variant::Atom(stratum_value::Atom::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_validated(&self) -> bool {
        self.state == SnapshotState::Validated
    }

    /// Collect the structural references a snapshot makes into other
    /// objects: edge endpoints, parent, and children. Used by the
    /// referential integrity pass during frame acceptance.
    pub fn structural_references(&self) -> Vec<ObjectId> {
        let mut refs = Vec::new();
        if let Some(origin) = self.structure.origin() {
            refs.push(origin);
        }
        if let Some(target) = self.structure.target() {
            refs.push(target);
        }
        if let Some(parent) = self.parent {
            refs.push(parent);
        }
        refs.extend(self.children.iter().copied());
        refs
    }

    /// Produce a fresh snapshot copying everything but the snapshot id. The
    /// caller supplies the new id.
    pub fn derive(&self, new_snapshot_id: SnapshotId) -> ObjectSnapshot {
        ObjectSnapshot {
            object_id: self.object_id,
            snapshot_id: new_snapshot_id,
            object_type: self.object_type.clone(),
            structure: self.structure.clone(),
            attributes: self.attributes.clone(),
            parent: self.parent,
            children: self.children.clone(),
            state: SnapshotState::Transient,
        }
    }
}
