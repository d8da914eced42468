use stratum_value::ObjectId;

use crate::{FrameView, Predicate, Requirement};

/// A `(predicate, requirement)` pair a frame must satisfy at acceptance.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    name: String,
    predicate: Predicate,
    requirement: Requirement,
}

impl Constraint {
    pub fn new(name: impl Into<String>, predicate: Predicate, requirement: Requirement) -> Self {
        Self {
            name: name.into(),
            predicate,
            requirement,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run this constraint over a frame; `None` if no violation.
    pub fn check(&self, frame: &dyn FrameView) -> Option<ConstraintViolation> {
        let candidates = self.predicate.select(frame);
        let violators = self.requirement.check(frame, &candidates);
        if violators.is_empty() {
            None
        } else {
            Some(ConstraintViolation {
                constraint_name: self.name.clone(),
                objects: violators,
            })
        }
    }
}

/// The result of a failed constraint: which constraint, and which objects
/// violated it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    pub constraint_name: String,
    pub objects: Vec<ObjectId>,
}
