use stratum_value::ObjectId;

use crate::{FrameView, ObjectView};

/// Built-in predicate combinators. Encoded as a sum type with explicit
/// combinators rather than via trait objects/inheritance, so evaluation
/// stays a total recursive function over a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Any,
    IsType(String),
    HasTrait(String),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }

    pub fn matches(&self, object: &dyn ObjectView) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::IsType(name) => object.type_name() == name,
            Predicate::HasTrait(name) => object.has_trait(name),
            Predicate::And(a, b) => a.matches(object) && b.matches(object),
            Predicate::Or(a, b) => a.matches(object) || b.matches(object),
            Predicate::Not(inner) => !inner.matches(object),
        }
    }

    /// Select every matching object id from a frame.
    pub fn select(&self, frame: &dyn FrameView) -> Vec<ObjectId> {
        frame
            .objects()
            .into_iter()
            .filter(|object| self.matches(*object))
            .map(|object| object.id())
            .collect()
    }
}
