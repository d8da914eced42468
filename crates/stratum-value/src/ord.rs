//! Ordering for the numeric and string atom kinds.
//!
//! `point` and arrays are never ordered; any other cross-kind comparison
//! (e.g. `string` vs `bool`) also fails. Numeric comparison promotes `int`
//! to `double` when the two sides differ, mirroring the equality rule.

use std::cmp::Ordering;
use std::fmt;

use crate::{Atom, Variant, ValueType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotComparableError {
    pub lhs: ValueType,
    pub rhs: ValueType,
}

impl fmt::Display for NotComparableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} and {} are not comparable", self.lhs, self.rhs)
    }
}

impl std::error::Error for NotComparableError {}

pub fn compare(a: &Variant, b: &Variant) -> Result<Ordering, NotComparableError> {
    let not_comparable = || NotComparableError {
        lhs: a.value_type(),
        rhs: b.value_type(),
    };

    let (Some(a), Some(b)) = (a.as_atom(), b.as_atom()) else {
        return Err(not_comparable());
    };

    match (a, b) {
        (Atom::Int(x), Atom::Int(y)) => Ok(x.cmp(y)),
        (Atom::Double(x), Atom::Double(y)) => x.partial_cmp(y).ok_or_else(not_comparable),
        (Atom::Int(x), Atom::Double(y)) => (*x as f64).partial_cmp(y).ok_or_else(not_comparable),
        (Atom::Double(x), Atom::Int(y)) => x.partial_cmp(&(*y as f64)).ok_or_else(not_comparable),
        (Atom::String(x), Atom::String(y)) => Ok(x.cmp(y)),
        _ => Err(not_comparable()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ordering_promotes_int_to_double() {
        assert_eq!(
            compare(&Variant::int(1), &Variant::double(1.5)),
            Ok(Ordering::Less)
        );
    }

    #[test]
    fn strings_order_lexicographically() {
        assert_eq!(
            compare(&Variant::string("a"), &Variant::string("b")),
            Ok(Ordering::Less)
        );
    }

    #[test]
    fn point_and_bool_are_not_ordered() {
        assert!(compare(&Variant::point(0.0, 0.0), &Variant::point(1.0, 1.0)).is_err());
        assert!(compare(&Variant::bool(true), &Variant::bool(false)).is_err());
    }

    #[test]
    fn cross_kind_comparison_fails() {
        assert!(compare(&Variant::string("1"), &Variant::int(1)).is_err());
    }
}
