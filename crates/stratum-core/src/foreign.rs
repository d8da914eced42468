//! The foreign-record shape an external archive layer reconstructs state
//! through. There is no wire format in scope here — this is the in-memory
//! contract an archive reader/writer built outside this crate would
//! translate to and from its own format.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use stratum_value::{ObjectId, SnapshotId, Variant};

use crate::error::CoreError;
use crate::memory::Memory;
use crate::snapshot::{SnapshotState, StructuralComponent};

/// The structural tag and endpoints of a foreign record, mirroring
/// `StructuralComponent` but independent of it so this module has no
/// hidden coupling to the in-memory representation's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignStructure {
    Unstructured,
    Node,
    Edge { origin: ObjectId, target: ObjectId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignInfo {
    pub id: ObjectId,
    pub snapshot_id: SnapshotId,
    pub type_name: String,
    pub structure: ForeignStructure,
    pub parent: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignRecord {
    pub info: ForeignInfo,
    pub attributes: HashMap<String, Variant>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForeignError {
    UnknownObjectType(String),
    Core(CoreError),
}

impl fmt::Display for ForeignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForeignError::UnknownObjectType(name) => write!(f, "unknown object type: `{name}`"),
            ForeignError::Core(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ForeignError {}

impl Memory {
    /// Reconstruct a snapshot from a foreign record, resolving its type
    /// against the bound metamodel and reserving its IDs exactly as given.
    pub fn create_snapshot_from_foreign(&mut self, record: ForeignRecord) -> Result<SnapshotId, ForeignError> {
        let object_type = self
            .metamodel()
            .type_by_name(&record.info.type_name)
            .cloned()
            .ok_or_else(|| ForeignError::UnknownObjectType(record.info.type_name.clone()))?;

        let structure = match record.info.structure {
            ForeignStructure::Unstructured => StructuralComponent::Unstructured,
            ForeignStructure::Node => StructuralComponent::Node,
            ForeignStructure::Edge { origin, target } => StructuralComponent::Edge { origin, target },
        };

        let snapshot_id = self
            .create_snapshot(
                Arc::new(object_type),
                Some(record.info.id),
                Some(record.info.snapshot_id),
                record.attributes,
                Some(structure),
                SnapshotState::Validated,
            )
            .map_err(ForeignError::Core)?;

        if let Some(parent) = record.info.parent {
            self.snapshot_mut(snapshot_id).parent = Some(parent);
        }

        Ok(snapshot_id)
    }

    /// Export a known snapshot as a foreign record.
    ///
    /// Panics if `snapshot_id` is unknown.
    pub fn export_foreign(&self, snapshot_id: SnapshotId) -> ForeignRecord {
        let snapshot = self.snapshot(snapshot_id);
        let structure = match &snapshot.structure {
            StructuralComponent::Unstructured => ForeignStructure::Unstructured,
            StructuralComponent::Node => ForeignStructure::Node,
            StructuralComponent::Edge { origin, target } => ForeignStructure::Edge {
                origin: *origin,
                target: *target,
            },
        };
        ForeignRecord {
            info: ForeignInfo {
                id: snapshot.object_id,
                snapshot_id: snapshot.snapshot_id,
                type_name: snapshot.object_type.name().to_string(),
                structure,
                parent: snapshot.parent,
            },
            attributes: snapshot.attributes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use stratum_metamodel::{Metamodel, ObjectType, StructuralKind};

    use super::*;

    #[test]
    fn round_trips_a_snapshot_through_the_foreign_shape() {
        let ty = ObjectType::new("Widget", StructuralKind::Unstructured);
        let mm = Metamodel::new().with_type(ty);
        let mut mem = Memory::new(mm).unwrap();

        let mut attrs = HashMap::new();
        attrs.insert("label".to_string(), Variant::string("a widget"));
        let snap = mem
            .create_snapshot(
                Arc::new(mem.metamodel().type_by_name("Widget").unwrap().clone()),
                None,
                None,
                attrs,
                None,
                SnapshotState::Validated,
            )
            .unwrap();

        let record = mem.export_foreign(snap);
        assert_eq!(record.info.type_name, "Widget");

        let mut mem2 = Memory::new(Metamodel::new().with_type(ObjectType::new("Widget", StructuralKind::Unstructured))).unwrap();
        let reconstructed = mem2.create_snapshot_from_foreign(record.clone()).unwrap();
        assert_eq!(reconstructed, record.info.snapshot_id);
        assert_eq!(mem2.snapshot(reconstructed).object_id, record.info.id);
    }

    #[test]
    fn unknown_type_is_reported() {
        let mut mem = Memory::new(Metamodel::new()).unwrap();
        let record = ForeignRecord {
            info: ForeignInfo {
                id: ObjectId::new(1),
                snapshot_id: SnapshotId::new(1),
                type_name: "Ghost".to_string(),
                structure: ForeignStructure::Unstructured,
                parent: None,
            },
            attributes: HashMap::new(),
        };
        let result = mem.create_snapshot_from_foreign(record);
        assert!(matches!(result, Err(ForeignError::UnknownObjectType(name)) if name == "Ghost"));
    }
}
