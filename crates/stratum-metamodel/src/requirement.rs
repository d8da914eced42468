use std::collections::{HashMap, HashSet};

use stratum_value::{ObjectId, Variant};

use crate::{FrameView, ObjectView, Predicate};

/// Built-in requirements: given the candidates a predicate selected, return
/// the subset that violates the requirement.
#[derive(Debug, Clone, PartialEq)]
pub enum Requirement {
    /// Every candidate violates.
    RejectAll,
    /// No candidate violates.
    AcceptAll,
    /// Every candidate in a group that shares the same value for
    /// `attribute` violates (the whole group is reported, not just the
    /// second-and-later occurrences, so callers see the full conflict).
    UniqueAttribute(String),
    /// Edge candidates whose reverse (target -> origin) also appears among
    /// the candidates violate.
    UnidirectionalEdge,
    /// Candidates that sit on a cycle in the subgraph induced by `edge`
    /// (an edge-selecting predicate) violate.
    AcyclicGraph(Predicate),
}

impl Requirement {
    pub fn check(&self, frame: &dyn FrameView, candidates: &[ObjectId]) -> Vec<ObjectId> {
        match self {
            Requirement::RejectAll => candidates.to_vec(),
            Requirement::AcceptAll => Vec::new(),
            Requirement::UniqueAttribute(attribute) => {
                let mut groups: HashMap<&Variant, Vec<ObjectId>> = HashMap::new();
                let objects: Vec<&dyn ObjectView> = candidates
                    .iter()
                    .filter_map(|id| frame.object(*id))
                    .collect();
                for object in &objects {
                    if let Some(value) = object.attribute(attribute) {
                        groups.entry(value).or_default().push(object.id());
                    }
                }
                let mut violators: Vec<ObjectId> = groups
                    .into_values()
                    .filter(|group| group.len() > 1)
                    .flatten()
                    .collect();
                violators.sort();
                violators
            }
            Requirement::UnidirectionalEdge => {
                let candidate_set: HashSet<ObjectId> = candidates.iter().copied().collect();
                let mut reverse_present = HashSet::new();
                let pairs: Vec<(ObjectId, Option<ObjectId>, Option<ObjectId>)> = candidates
                    .iter()
                    .filter_map(|id| frame.object(*id))
                    .map(|o| (o.id(), o.origin(), o.target()))
                    .collect();
                for (id, origin, target) in &pairs {
                    if let (Some(origin), Some(target)) = (origin, target) {
                        let has_reverse = pairs.iter().any(|(other_id, other_origin, other_target)| {
                            other_id != id
                                && *other_origin == Some(*target)
                                && *other_target == Some(*origin)
                        });
                        if has_reverse {
                            reverse_present.insert(*id);
                        }
                    }
                }
                candidate_set
                    .into_iter()
                    .filter(|id| reverse_present.contains(id))
                    .collect()
            }
            Requirement::AcyclicGraph(edge_predicate) => {
                cycle_members(frame, candidates, edge_predicate)
            }
        }
    }
}

/// Plain DFS cycle detection over the subgraph induced by `candidates` and
/// `edge_predicate`-matching edges. Duplicated, smaller cousin of
/// `stratum-graph::topological_sort`: the metamodel cannot depend on the
/// graph crate (component E depends on C, not the reverse), so constraint
/// checking carries its own minimal traversal.
fn cycle_members(
    frame: &dyn FrameView,
    candidates: &[ObjectId],
    edge_predicate: &Predicate,
) -> Vec<ObjectId> {
    let node_set: HashSet<ObjectId> = candidates.iter().copied().collect();
    let mut adjacency: HashMap<ObjectId, Vec<ObjectId>> = HashMap::new();
    for object in frame.objects() {
        if !edge_predicate.matches(object) {
            continue;
        }
        if let (Some(origin), Some(target)) = (object.origin(), object.target()) {
            if node_set.contains(&origin) && node_set.contains(&target) {
                adjacency.entry(origin).or_default().push(target);
            }
        }
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    let mut marks: HashMap<ObjectId, Mark> = node_set.iter().map(|id| (*id, Mark::Unvisited)).collect();
    let mut on_cycle = HashSet::new();
    let mut stack = Vec::new();

    fn visit(
        node: ObjectId,
        adjacency: &HashMap<ObjectId, Vec<ObjectId>>,
        marks: &mut HashMap<ObjectId, Mark>,
        stack: &mut Vec<ObjectId>,
        on_cycle: &mut HashSet<ObjectId>,
    ) {
        marks.insert(node, Mark::InProgress);
        stack.push(node);
        if let Some(successors) = adjacency.get(&node) {
            for &next in successors {
                match marks.get(&next).copied().unwrap_or(Mark::Done) {
                    Mark::Unvisited => visit(next, adjacency, marks, stack, on_cycle),
                    Mark::InProgress => {
                        if let Some(pos) = stack.iter().position(|id| *id == next) {
                            on_cycle.extend(stack[pos..].iter().copied());
                        }
                    }
                    Mark::Done => {}
                }
            }
        }
        stack.pop();
        marks.insert(node, Mark::Done);
    }

    let mut ordered: Vec<ObjectId> = node_set.into_iter().collect();
    ordered.sort();
    for node in ordered {
        if marks.get(&node).copied() == Some(Mark::Unvisited) {
            visit(node, &adjacency, &mut marks, &mut stack, &mut on_cycle);
        }
    }

    let mut result: Vec<ObjectId> = on_cycle.into_iter().collect();
    result.sort();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StructuralKind;

    struct Edge {
        id: ObjectId,
        origin: ObjectId,
        target: ObjectId,
    }

    impl ObjectView for Edge {
        fn id(&self) -> ObjectId {
            self.id
        }
        fn type_name(&self) -> &str {
            "Edge"
        }
        fn has_trait(&self, _: &str) -> bool {
            false
        }
        fn structural_kind(&self) -> StructuralKind {
            StructuralKind::Edge
        }
        fn origin(&self) -> Option<ObjectId> {
            Some(self.origin)
        }
        fn target(&self) -> Option<ObjectId> {
            Some(self.target)
        }
        fn attribute(&self, _: &str) -> Option<&Variant> {
            None
        }
    }

    struct Frame(Vec<Edge>);
    impl FrameView for Frame {
        fn objects(&self) -> Vec<&dyn ObjectView> {
            self.0.iter().map(|o| o as &dyn ObjectView).collect()
        }
    }

    #[test]
    fn reject_all_rejects_every_candidate() {
        let frame = Frame(vec![]);
        let candidates = vec![ObjectId::new(1), ObjectId::new(2)];
        assert_eq!(
            Requirement::RejectAll.check(&frame, &candidates),
            candidates
        );
        assert!(Requirement::AcceptAll.check(&frame, &candidates).is_empty());
    }

    #[test]
    fn acyclic_graph_flags_cycle_members() {
        // a -> b -> c -> a
        let frame = Frame(vec![
            Edge {
                id: ObjectId::new(10),
                origin: ObjectId::new(1),
                target: ObjectId::new(2),
            },
            Edge {
                id: ObjectId::new(11),
                origin: ObjectId::new(2),
                target: ObjectId::new(3),
            },
            Edge {
                id: ObjectId::new(12),
                origin: ObjectId::new(3),
                target: ObjectId::new(1),
            },
        ]);
        let candidates = vec![ObjectId::new(1), ObjectId::new(2), ObjectId::new(3)];
        let violators = Requirement::AcyclicGraph(Predicate::Any).check(&frame, &candidates);
        assert_eq!(violators, candidates);
    }

    #[test]
    fn acyclic_graph_accepts_dag() {
        let frame = Frame(vec![
            Edge {
                id: ObjectId::new(10),
                origin: ObjectId::new(1),
                target: ObjectId::new(2),
            },
            Edge {
                id: ObjectId::new(11),
                origin: ObjectId::new(2),
                target: ObjectId::new(3),
            },
        ]);
        let candidates = vec![ObjectId::new(1), ObjectId::new(2), ObjectId::new(3)];
        assert!(
            Requirement::AcyclicGraph(Predicate::Any)
                .check(&frame, &candidates)
                .is_empty()
        );
    }
}
