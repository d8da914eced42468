//! Tagged scalar/array value type (`Variant`) for the object memory and the
//! expression language.
//!
//! An atom is one of a closed set of scalar kinds; a [`Variant`] is either a
//! single atom or a homogeneous array of atoms tagged by their item kind.
//! Conversion between kinds follows a fixed, documented graph rather than
//! Rust's `From`/`TryFrom` so that failure can be reported uniformly.

mod convert;
mod id;
mod ord;
#[cfg(feature = "serde")]
mod serde_impl;

pub use id::{FrameId, ObjectId, SnapshotId};

use std::fmt;
use std::hash::{Hash, Hasher};

use ordered_float::OrderedFloat;

pub use convert::{is_convertible, ConversionError};
pub use ord::NotComparableError;

/// The kind of a single atom, independent of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomType {
    Int,
    Double,
    Bool,
    String,
    Point,
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AtomType::Int => "int",
            AtomType::Double => "double",
            AtomType::Bool => "bool",
            AtomType::String => "string",
            AtomType::Point => "point",
        };
        f.write_str(name)
    }
}

/// The kind of a [`Variant`]: a bare atom, or an array of a given atom kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Atom(AtomType),
    Array(AtomType),
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Atom(kind) => write!(f, "{kind}"),
            ValueType::Array(kind) => write!(f, "array<{kind}>"),
        }
    }
}

/// A single scalar value.
#[derive(Debug, Clone)]
pub enum Atom {
    Int(i64),
    Double(f64),
    Bool(bool),
    String(String),
    /// A pair of doubles.
    Point(f64, f64),
}

impl Atom {
    pub fn atom_type(&self) -> AtomType {
        match self {
            Atom::Int(_) => AtomType::Int,
            Atom::Double(_) => AtomType::Double,
            Atom::Bool(_) => AtomType::Bool,
            Atom::String(_) => AtomType::String,
            Atom::Point(_, _) => AtomType::Point,
        }
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        use Atom::*;
        match (self, other) {
            (Int(a), Int(b)) => a == b,
            (Double(a), Double(b)) => a == b,
            (Int(a), Double(b)) | (Double(b), Int(a)) => (*a as f64) == *b,
            (Bool(a), Bool(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Point(ax, ay), Point(bx, by)) => ax == bx && ay == by,
            _ => false,
        }
    }
}

/// Atoms are totally equatable: equality never fails, it is simply `false`
/// across unrelated kinds. Hashing is kept consistent with the numeric
/// cross-kind promotion in [`PartialEq`] by always hashing numeric atoms as
/// their `f64` representation.
impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Atom::Int(i) => OrderedFloat(*i as f64).hash(state),
            Atom::Double(d) => OrderedFloat(*d).hash(state),
            Atom::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Atom::String(s) => {
                2u8.hash(state);
                s.hash(state);
            }
            Atom::Point(x, y) => {
                3u8.hash(state);
                OrderedFloat(*x).hash(state);
                OrderedFloat(*y).hash(state);
            }
        }
    }
}

/// A tagged scalar or homogeneous array value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Variant {
    Atom(Atom),
    Array(AtomType, Vec<Atom>),
}

impl Variant {
    pub fn int(value: i64) -> Self {
        Variant::Atom(Atom::Int(value))
    }

    pub fn double(value: f64) -> Self {
        Variant::Atom(Atom::Double(value))
    }

    pub fn bool(value: bool) -> Self {
        Variant::Atom(Atom::Bool(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Variant::Atom(Atom::String(value.into()))
    }

    pub fn point(x: f64, y: f64) -> Self {
        Variant::Atom(Atom::Point(x, y))
    }

    /// Build a homogeneous array. Every item must have kind `item_kind`.
    ///
    /// This is a construction-time invariant, not a runtime error case:
    /// callers assemble arrays from values they already typed-checked (e.g.
    /// the metamodel's default values, or the evaluator's own literals). A
    /// heterogeneous array reaching here is a caller bug.
    pub fn array(item_kind: AtomType, items: Vec<Atom>) -> Self {
        debug_assert!(
            items.iter().all(|item| item.atom_type() == item_kind),
            "heterogeneous array: expected all items to be {item_kind}"
        );
        Variant::Array(item_kind, items)
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Variant::Atom(atom) => ValueType::Atom(atom.atom_type()),
            Variant::Array(kind, _) => ValueType::Array(*kind),
        }
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Variant::Atom(atom) => Some(atom),
            Variant::Array(_, _) => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Atom]> {
        match self {
            Variant::Array(_, items) => Some(items),
            Variant::Atom(_) => None,
        }
    }

    pub fn to_int(&self) -> Result<i64, ConversionError> {
        convert::to_int(self)
    }

    pub fn to_double(&self) -> Result<f64, ConversionError> {
        convert::to_double(self)
    }

    pub fn to_bool(&self) -> Result<bool, ConversionError> {
        convert::to_bool(self)
    }

    pub fn to_plain_string(&self) -> Result<String, ConversionError> {
        convert::to_plain_string(self)
    }

    pub fn to_point(&self) -> Result<(f64, f64), ConversionError> {
        convert::to_point(self)
    }

    /// Whether a value of kind `self.value_type()` can be converted to `to`.
    pub fn is_convertible(&self, to: ValueType) -> bool {
        convert::is_convertible(self.value_type(), to)
    }

    /// Total ordering within the numeric and string atom kinds; errors for
    /// `point`, arrays, `bool`, and any cross-kind comparison other than
    /// int/double promotion.
    pub fn compare(&self, other: &Variant) -> Result<std::cmp::Ordering, NotComparableError> {
        ord::compare(self, other)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn numeric_cross_kind_equality() {
        assert_eq!(Variant::int(2), Variant::double(2.0));
        assert_ne!(Variant::int(2), Variant::double(2.5));
    }

    #[test]
    fn equality_is_total_across_unrelated_kinds() {
        assert_ne!(Variant::bool(true), Variant::string("true"));
        assert_ne!(Variant::int(1), Variant::bool(true));
    }

    #[test]
    fn hash_agrees_with_numeric_equality() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(v: &Variant) -> u64 {
            let mut hasher = DefaultHasher::new();
            v.hash(&mut hasher);
            hasher.finish()
        }

        assert_eq!(hash_of(&Variant::int(2)), hash_of(&Variant::double(2.0)));
    }

    #[test]
    fn value_type_reporting() {
        assert_eq!(Variant::int(1).value_type(), ValueType::Atom(AtomType::Int));
        assert_eq!(
            Variant::array(AtomType::Int, vec![Atom::Int(1), Atom::Int(2)]).value_type(),
            ValueType::Array(AtomType::Int)
        );
    }

    #[test]
    #[should_panic(expected = "heterogeneous array")]
    fn array_rejects_heterogeneous_items_in_debug() {
        let _ = Variant::array(AtomType::Int, vec![Atom::Int(1), Atom::Bool(true)]);
    }
}
