use std::fmt;

use stratum_value::{Variant, ValueType};

/// The structural payload a snapshot of this type may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuralKind {
    Unstructured,
    Node,
    Edge,
}

impl fmt::Display for StructuralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructuralKind::Unstructured => "unstructured",
            StructuralKind::Node => "node",
            StructuralKind::Edge => "edge",
        };
        f.write_str(name)
    }
}

/// One named, typed attribute slot.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescriptor {
    pub name: String,
    pub value_type: ValueType,
    pub default: Option<Variant>,
    pub doc: Option<String>,
}

impl AttributeDescriptor {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            default: None,
            doc: None,
        }
    }

    pub fn with_default(mut self, default: Variant) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// A named, reusable set of attribute descriptors, used as a mixin.
#[derive(Debug, Clone, PartialEq)]
pub struct Trait {
    name: String,
    attributes: Vec<AttributeDescriptor>,
}

impl Trait {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeDescriptor) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// A named type: a structural kind plus an ordered list of traits.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    name: String,
    structural_kind: StructuralKind,
    traits: Vec<Trait>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>, structural_kind: StructuralKind) -> Self {
        Self {
            name: name.into(),
            structural_kind,
            traits: Vec::new(),
        }
    }

    pub fn with_trait(mut self, trait_def: Trait) -> Self {
        self.traits.push(trait_def);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn structural_kind(&self) -> StructuralKind {
        self.structural_kind
    }

    pub fn traits(&self) -> &[Trait] {
        &self.traits
    }

    pub fn has_trait(&self, trait_name: &str) -> bool {
        self.traits.iter().any(|t| t.name() == trait_name)
    }

    /// The fully resolved attribute list: every trait's attributes, in
    /// trait order. Fails if the same attribute name is declared by more
    /// than one trait — duplicate names are a metamodel error, not a
    /// first-match fallback.
    pub fn attributes(&self) -> Result<Vec<&AttributeDescriptor>, MetamodelError> {
        let mut seen: Vec<(&str, &str)> = Vec::new(); // (attribute name, trait name)
        let mut result = Vec::new();
        for trait_def in &self.traits {
            for attribute in trait_def.attributes() {
                if let Some((_, first_trait)) =
                    seen.iter().find(|(name, _)| *name == attribute.name)
                {
                    return Err(MetamodelError::DuplicateAttribute {
                        type_name: self.name.clone(),
                        attribute_name: attribute.name.clone(),
                        first_trait: first_trait.to_string(),
                        second_trait: trait_def.name().to_string(),
                    });
                }
                seen.push((&attribute.name, trait_def.name()));
                result.push(attribute);
            }
        }
        Ok(result)
    }

    /// Resolve one attribute by walking traits in declaration order and
    /// returning the first match. Valid to call once `attributes()` has
    /// been checked to be unambiguous (e.g. at metamodel-bind time); it does
    /// not re-check ambiguity itself.
    pub fn attribute_by_name(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.traits.iter().find_map(|t| t.attribute(name))
    }
}

/// A built-in variable name the expression language may bind against,
/// independent of any particular object.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinVariable {
    pub name: String,
    pub value_type: ValueType,
}

impl BuiltinVariable {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetamodelError {
    DuplicateAttribute {
        type_name: String,
        attribute_name: String,
        first_trait: String,
        second_trait: String,
    },
}

impl fmt::Display for MetamodelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetamodelError::DuplicateAttribute {
                type_name,
                attribute_name,
                first_trait,
                second_trait,
            } => write!(
                f,
                "type `{type_name}` has ambiguous attribute `{attribute_name}`: declared by both trait `{first_trait}` and trait `{second_trait}`"
            ),
        }
    }
}

impl std::error::Error for MetamodelError {}
