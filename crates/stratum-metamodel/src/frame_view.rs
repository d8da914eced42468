use stratum_value::{ObjectId, Variant};

use crate::StructuralKind;

/// The view of one candidate object a predicate or requirement needs.
/// Implemented by `stratum-core`'s snapshot/frame types; the metamodel
/// itself never depends on them.
pub trait ObjectView {
    fn id(&self) -> ObjectId;
    fn type_name(&self) -> &str;
    fn has_trait(&self, trait_name: &str) -> bool;
    fn structural_kind(&self) -> StructuralKind;
    /// The edge origin, if this object is structurally an edge.
    fn origin(&self) -> Option<ObjectId>;
    /// The edge target, if this object is structurally an edge.
    fn target(&self) -> Option<ObjectId>;
    /// An attribute's current value, if the object carries one by that name.
    fn attribute(&self, name: &str) -> Option<&Variant>;
}

/// The view of a frame a predicate or requirement runs over.
pub trait FrameView {
    fn objects(&self) -> Vec<&dyn ObjectView>;

    fn object(&self, id: ObjectId) -> Option<&dyn ObjectView> {
        self.objects().into_iter().find(|o| o.id() == id)
    }
}
