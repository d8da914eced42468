use std::fmt;

use stratum_metamodel::StructuralKind;
use stratum_value::ObjectId;

/// Recoverable errors from object-memory operations that are *not*
/// programming errors. `unknown-snapshot`, `unknown-frame`, and
/// `duplicate-id` are deliberately absent here: those three are
/// programming errors and are raised via `panic!` at their call sites
/// instead.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The structural payload doesn't match the type's structural kind
    /// (e.g. an edge type created without origin/target, or a node type
    /// given edge endpoints).
    StructuralKindMismatch {
        type_name: String,
        expected: StructuralKind,
    },
    /// An edge-kind type was created without origin/target.
    MissingEdgeEndpoints { type_name: String },
    /// A foreign record names a type the bound metamodel doesn't define.
    UnknownObjectType(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::StructuralKindMismatch { type_name, expected } => write!(
                f,
                "type `{type_name}` is `{expected}` but was given a mismatched structural payload"
            ),
            CoreError::MissingEdgeEndpoints { type_name } => {
                write!(f, "type `{type_name}` is an edge type and requires origin/target endpoints")
            }
            CoreError::UnknownObjectType(name) => write!(f, "unknown object type: `{name}`"),
        }
    }
}

impl std::error::Error for CoreError {}

/// A single type error raised during frame acceptance.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeError {
    pub object: ObjectId,
    pub attribute: String,
    pub kind: TypeErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeErrorKind {
    /// A required attribute (no default) is missing.
    Missing,
    /// An attribute is present but has the wrong value kind.
    WrongType {
        expected: stratum_value::ValueType,
        got: stratum_value::ValueType,
    },
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeErrorKind::Missing => write!(
                f,
                "object {} is missing required attribute `{}`",
                self.object, self.attribute
            ),
            TypeErrorKind::WrongType { expected, got } => write!(
                f,
                "object {} attribute `{}` expected {expected}, got {got}",
                self.object, self.attribute
            ),
        }
    }
}

/// The aggregate error from a failed `accept`. All three error sets are
/// collected before returning; the frame is left `open` and untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameValidationError {
    pub broken_references: Vec<ObjectId>,
    pub type_errors: Vec<TypeError>,
    pub violations: Vec<stratum_metamodel::ConstraintViolation>,
}

impl FrameValidationError {
    pub fn is_empty(&self) -> bool {
        self.broken_references.is_empty() && self.type_errors.is_empty() && self.violations.is_empty()
    }
}

impl fmt::Display for FrameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame validation failed: {} broken reference(s), {} type error(s), {} constraint violation(s)",
            self.broken_references.len(),
            self.type_errors.len(),
            self.violations.len()
        )
    }
}

impl std::error::Error for FrameValidationError {}
