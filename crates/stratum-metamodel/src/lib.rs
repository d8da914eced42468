//! The metamodel: object types, traits, attribute descriptors, structural
//! kinds, the predicate/requirement algebra, and constraints.
//!
//! This crate never touches a concrete frame. It defines [`ObjectView`] and
//! [`FrameView`], the minimal interface a frame needs to expose for
//! predicates and requirements to run over it; `stratum-core` implements
//! both traits for its own frame types. That keeps the dependency arrow
//! pointing one way: core depends on metamodel, never the reverse.

mod constraint;
mod frame_view;
mod predicate;
mod requirement;
mod types;

pub use constraint::{Constraint, ConstraintViolation};
pub use frame_view::{FrameView, ObjectView};
pub use predicate::Predicate;
pub use requirement::Requirement;
pub use types::{
    AttributeDescriptor, BuiltinVariable, MetamodelError, ObjectType, StructuralKind, Trait,
};

use std::fmt;

use tracing::{debug, trace};

/// The schema bound to one `Memory`: object types, traits, built-in
/// variables, and constraints.
#[derive(Debug, Clone, Default)]
pub struct Metamodel {
    object_types: Vec<ObjectType>,
    traits: Vec<Trait>,
    variables: Vec<BuiltinVariable>,
    constraints: Vec<Constraint>,
}

impl Metamodel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, object_type: ObjectType) -> Self {
        self.object_types.push(object_type);
        self
    }

    pub fn with_trait(mut self, trait_def: Trait) -> Self {
        self.traits.push(trait_def);
        self
    }

    pub fn with_variable(mut self, variable: BuiltinVariable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn object_types(&self) -> &[ObjectType] {
        &self.object_types
    }

    pub fn traits(&self) -> &[Trait] {
        &self.traits
    }

    pub fn variables(&self) -> &[BuiltinVariable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn type_by_name(&self, name: &str) -> Option<&ObjectType> {
        self.object_types.iter().find(|t| t.name() == name)
    }

    pub fn trait_by_name(&self, name: &str) -> Option<&Trait> {
        self.traits.iter().find(|t| t.name() == name)
    }

    pub fn variable_by_name(&self, name: &str) -> Option<&BuiltinVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// The fully resolved (trait-walked) attribute descriptor list for a
    /// named type. `None` if no type named `type_name` is registered; the
    /// inner `Result` carries the same ambiguous-attribute error
    /// `validate`/`ObjectType::attributes` report.
    pub fn attributes_of(&self, type_name: &str) -> Option<Result<Vec<&AttributeDescriptor>, MetamodelError>> {
        Some(self.type_by_name(type_name)?.attributes())
    }

    /// Checks every object type's attribute list is unambiguous. Called
    /// once when a `Memory` binds this metamodel (rebinding is not
    /// supported).
    pub fn validate(&self) -> Result<(), Vec<MetamodelError>> {
        trace!(types = self.object_types.len(), traits = self.traits.len(), "metamodel: validate");
        let mut errors = Vec::new();
        for object_type in &self.object_types {
            if let Err(err) = object_type.attributes() {
                errors.push(err);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            debug!(errors = errors.len(), "metamodel: validate found ambiguous attributes");
            Err(errors)
        }
    }
}

impl fmt::Display for Metamodel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "metamodel({} types, {} traits, {} constraints)",
            self.object_types.len(),
            self.traits.len(),
            self.constraints.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use stratum_value::{AtomType, ValueType};

    fn name_trait() -> Trait {
        Trait::new("Named").with_attribute(AttributeDescriptor::new(
            "name",
            ValueType::Atom(AtomType::String),
        ))
    }

    #[test]
    fn type_and_trait_lookup() {
        let mm = Metamodel::new()
            .with_trait(name_trait())
            .with_type(ObjectType::new("Box", StructuralKind::Unstructured).with_trait(name_trait()));

        assert!(mm.type_by_name("Box").is_some());
        assert!(mm.type_by_name("Missing").is_none());
        assert!(mm.trait_by_name("Named").is_some());
    }

    #[test]
    fn attributes_of_resolves_the_trait_walked_list() {
        let mm = Metamodel::new()
            .with_trait(name_trait())
            .with_type(ObjectType::new("Box", StructuralKind::Unstructured).with_trait(name_trait()));

        let attrs = mm.attributes_of("Box").expect("type exists").expect("unambiguous");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].name, "name");

        assert!(mm.attributes_of("Missing").is_none());
    }

    #[test]
    fn duplicate_attribute_across_traits_is_a_metamodel_error() {
        let a = Trait::new("A").with_attribute(AttributeDescriptor::new(
            "x",
            ValueType::Atom(AtomType::Int),
        ));
        let b = Trait::new("B").with_attribute(AttributeDescriptor::new(
            "x",
            ValueType::Atom(AtomType::Int),
        ));
        let ty = ObjectType::new("Dup", StructuralKind::Unstructured)
            .with_trait(a)
            .with_trait(b);

        assert!(ty.attributes().is_err());
    }
}
