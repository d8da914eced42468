//! Conversion graph between atom kinds.
//!
//! Rules: any atom converts to `string`; `string` converts to any atom kind
//! if the text parses; `int` and `double` convert to each other; `bool` only
//! parses from `string` (there is no implicit numeric-to-bool conversion).
//! Text parsing is culture-neutral: `.` as the decimal separator, `true`/
//! `false` literals, no locale-dependent formatting.

use std::fmt;

use crate::{Atom, AtomType, Variant, ValueType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    pub from: ValueType,
    pub to: ValueType,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot convert {} to {}", self.from, self.to)
    }
}

impl std::error::Error for ConversionError {}

fn fail(from: ValueType, to: AtomType) -> ConversionError {
    ConversionError {
        from,
        to: ValueType::Atom(to),
    }
}

pub fn to_int(value: &Variant) -> Result<i64, ConversionError> {
    let atom = value
        .as_atom()
        .ok_or_else(|| fail(value.value_type(), AtomType::Int))?;
    match atom {
        Atom::Int(i) => Ok(*i),
        Atom::Double(d) => Ok(*d as i64),
        Atom::String(s) => s
            .parse::<i64>()
            .map_err(|_| fail(value.value_type(), AtomType::Int)),
        Atom::Bool(_) | Atom::Point(_, _) => Err(fail(value.value_type(), AtomType::Int)),
    }
}

pub fn to_double(value: &Variant) -> Result<f64, ConversionError> {
    let atom = value
        .as_atom()
        .ok_or_else(|| fail(value.value_type(), AtomType::Double))?;
    match atom {
        Atom::Int(i) => Ok(*i as f64),
        Atom::Double(d) => Ok(*d),
        Atom::String(s) => s
            .parse::<f64>()
            .map_err(|_| fail(value.value_type(), AtomType::Double)),
        Atom::Bool(_) | Atom::Point(_, _) => Err(fail(value.value_type(), AtomType::Double)),
    }
}

pub fn to_bool(value: &Variant) -> Result<bool, ConversionError> {
    let atom = value
        .as_atom()
        .ok_or_else(|| fail(value.value_type(), AtomType::Bool))?;
    match atom {
        Atom::Bool(b) => Ok(*b),
        Atom::String(s) => match s.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(fail(value.value_type(), AtomType::Bool)),
        },
        Atom::Int(_) | Atom::Double(_) | Atom::Point(_, _) => {
            Err(fail(value.value_type(), AtomType::Bool))
        }
    }
}

pub fn to_plain_string(value: &Variant) -> Result<String, ConversionError> {
    let atom = value
        .as_atom()
        .ok_or_else(|| fail(value.value_type(), AtomType::String))?;
    Ok(match atom {
        Atom::Int(i) => i.to_string(),
        Atom::Double(d) => d.to_string(),
        Atom::Bool(b) => b.to_string(),
        Atom::String(s) => s.clone(),
        Atom::Point(x, y) => format!("{x},{y}"),
    })
}

/// String -> point parses an `"x,y"` pair, the plain comma-separated
/// rendering `to_plain_string` produces for point (see DESIGN.md for the
/// rationale).
fn parse_point(s: &str) -> Option<(f64, f64)> {
    let (x, y) = s.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

pub fn to_point(value: &Variant) -> Result<(f64, f64), ConversionError> {
    let atom = value
        .as_atom()
        .ok_or_else(|| fail(value.value_type(), AtomType::Point))?;
    match atom {
        Atom::Point(x, y) => Ok((*x, *y)),
        Atom::String(s) => parse_point(s).ok_or_else(|| fail(value.value_type(), AtomType::Point)),
        Atom::Int(_) | Atom::Double(_) | Atom::Bool(_) => {
            Err(fail(value.value_type(), AtomType::Point))
        }
    }
}

/// Whether `from` converts to `to`, independent of any particular value
/// (used by the metamodel/binder to type-check before attempting a
/// conversion).
pub fn is_convertible(from: ValueType, to: ValueType) -> bool {
    use AtomType::*;

    let (ValueType::Atom(from), ValueType::Atom(to)) = (from, to) else {
        // Arrays only convert to themselves; no array<->atom or
        // cross-item-kind array conversion is defined.
        return from == to;
    };

    if from == to {
        return true;
    }
    match (from, to) {
        (_, String) => true,
        (String, _) => true,
        (Int, Double) | (Double, Int) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_atom_converts_to_string() {
        for v in [
            Variant::int(1),
            Variant::double(1.5),
            Variant::bool(true),
            Variant::string("x"),
            Variant::point(1.0, 2.0),
        ] {
            assert!(v.is_convertible(ValueType::Atom(AtomType::String)));
            assert!(v.to_plain_string().is_ok());
        }
    }

    #[test]
    fn bool_only_parses_from_string() {
        assert!(!is_convertible(
            ValueType::Atom(AtomType::Int),
            ValueType::Atom(AtomType::Bool)
        ));
        assert!(!is_convertible(
            ValueType::Atom(AtomType::Double),
            ValueType::Atom(AtomType::Bool)
        ));
        assert!(is_convertible(
            ValueType::Atom(AtomType::String),
            ValueType::Atom(AtomType::Bool)
        ));
        assert_eq!(Variant::string("true").to_bool(), Ok(true));
        assert!(Variant::int(1).to_bool().is_err());
    }

    #[test]
    fn int_and_double_convert_both_ways() {
        assert_eq!(Variant::int(3).to_double(), Ok(3.0));
        assert_eq!(Variant::double(3.9).to_int(), Ok(3));
    }

    #[test]
    fn string_parses_into_any_atom_when_parseable() {
        assert_eq!(Variant::string("42").to_int(), Ok(42));
        assert_eq!(Variant::string("not-a-number").to_int().is_err(), true);
    }
}
