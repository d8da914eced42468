//! Foreign-record serialization for [`Variant`].
//!
//! A `Variant` serializes as `{ "type": "<kind>", "value": <json> }`, explicit
//! tagging so an external archive layer can reconstruct the right atom kind
//! without type inference.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Atom, AtomType, Variant};

fn atom_type_name(kind: AtomType) -> &'static str {
    match kind {
        AtomType::Int => "int",
        AtomType::Double => "double",
        AtomType::Bool => "bool",
        AtomType::String => "string",
        AtomType::Point => "point",
    }
}

fn atom_type_from_name(name: &str) -> Option<AtomType> {
    Some(match name {
        "int" => AtomType::Int,
        "double" => AtomType::Double,
        "bool" => AtomType::Bool,
        "string" => AtomType::String,
        "point" => AtomType::Point,
        _ => return None,
    })
}

impl Serialize for Atom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", atom_type_name(self.atom_type()))?;
        match self {
            Atom::Int(i) => map.serialize_entry("value", i)?,
            Atom::Double(d) => map.serialize_entry("value", d)?,
            Atom::Bool(b) => map.serialize_entry("value", b)?,
            Atom::String(s) => map.serialize_entry("value", s)?,
            Atom::Point(x, y) => map.serialize_entry("value", &(x, y))?,
        }
        map.end()
    }
}

impl Serialize for Variant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Variant::Atom(atom) => atom.serialize(serializer),
            Variant::Array(kind, items) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", &format!("array<{}>", atom_type_name(*kind)))?;
                map.serialize_entry("value", items)?;
                map.end()
            }
        }
    }
}

struct VariantVisitor;

impl<'de> Visitor<'de> for VariantVisitor {
    type Value = Variant;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(r#"a map with "type" and "value" keys"#)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Variant, A::Error> {
        let mut kind: Option<String> = None;
        let mut value: Option<serde_json::Value> = None;
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "type" => kind = Some(map.next_value()?),
                "value" => value = Some(map.next_value()?),
                _ => {
                    let _: serde_json::Value = map.next_value()?;
                }
            }
        }
        let kind = kind.ok_or_else(|| de::Error::missing_field("type"))?;
        let value = value.ok_or_else(|| de::Error::missing_field("value"))?;

        if let Some(inner) = kind.strip_prefix("array<").and_then(|s| s.strip_suffix('>')) {
            let item_kind = atom_type_from_name(inner)
                .ok_or_else(|| de::Error::custom(format!("unknown atom kind: {inner}")))?;
            let raw: Vec<serde_json::Value> =
                serde_json::from_value(value).map_err(de::Error::custom)?;
            let items = raw
                .into_iter()
                .map(|item| atom_from_json(item_kind, item).map_err(de::Error::custom))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Variant::array(item_kind, items));
        }

        let atom_kind = atom_type_from_name(&kind)
            .ok_or_else(|| de::Error::custom(format!("unknown atom kind: {kind}")))?;
        atom_from_json(atom_kind, value)
            .map(Variant::Atom)
            .map_err(de::Error::custom)
    }
}

fn atom_from_json(kind: AtomType, value: serde_json::Value) -> Result<Atom, String> {
    Ok(match kind {
        AtomType::Int => Atom::Int(
            value
                .as_i64()
                .ok_or_else(|| "expected an integer".to_string())?,
        ),
        AtomType::Double => Atom::Double(
            value
                .as_f64()
                .ok_or_else(|| "expected a number".to_string())?,
        ),
        AtomType::Bool => Atom::Bool(
            value
                .as_bool()
                .ok_or_else(|| "expected a boolean".to_string())?,
        ),
        AtomType::String => Atom::String(
            value
                .as_str()
                .ok_or_else(|| "expected a string".to_string())?
                .to_string(),
        ),
        AtomType::Point => {
            let (x, y): (f64, f64) =
                serde_json::from_value(value).map_err(|e| e.to_string())?;
            Atom::Point(x, y)
        }
    })
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(VariantVisitor)
    }
}
