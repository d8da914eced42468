//! A transient projection of a frame as a graph: snapshots with structural
//! kind `node` surface as nodes, `edge` as edges with origin/target
//! resolved against the same frame.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use stratum_metamodel::{FrameView, ObjectView, Predicate, StructuralKind};
use stratum_value::ObjectId;
use tracing::trace;

/// Which side of an edge a neighborhood walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// Filters a neighborhood query: which direction, and which edges count.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub direction: Direction,
    pub predicate: Predicate,
}

/// The edges around a node matching a [`Selector`], and the nodes at their
/// opposite endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Neighborhood {
    pub edges: Vec<ObjectId>,
    pub nodes: Vec<ObjectId>,
}

/// `topological_sort` found a cycle; these are the edges that close it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphCycle {
    pub back_edges: Vec<ObjectId>,
}

impl fmt::Display for GraphCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph has a cycle involving {} edge(s)", self.back_edges.len())
    }
}

impl std::error::Error for GraphCycle {}

/// A read-only graph view over any [`FrameView`] (stable or mutable).
pub struct GraphView<'a> {
    frame: &'a dyn FrameView,
}

impl<'a> GraphView<'a> {
    pub fn new(frame: &'a dyn FrameView) -> Self {
        Self { frame }
    }

    pub fn nodes(&self) -> Vec<ObjectId> {
        self.objects_of_kind(StructuralKind::Node)
    }

    pub fn edges(&self) -> Vec<ObjectId> {
        self.objects_of_kind(StructuralKind::Edge)
    }

    fn objects_of_kind(&self, kind: StructuralKind) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self
            .frame
            .objects()
            .into_iter()
            .filter(|o| o.structural_kind() == kind)
            .map(|o| o.id())
            .collect();
        ids.sort();
        ids
    }

    pub fn node(&self, id: ObjectId) -> Option<&dyn ObjectView> {
        self.frame.object(id).filter(|o| o.structural_kind() == StructuralKind::Node)
    }

    pub fn edge(&self, id: ObjectId) -> Option<&dyn ObjectView> {
        self.frame.object(id).filter(|o| o.structural_kind() == StructuralKind::Edge)
    }

    pub fn contains_node(&self, id: ObjectId) -> bool {
        self.node(id).is_some()
    }

    pub fn contains_edge(&self, id: ObjectId) -> bool {
        self.edge(id).is_some()
    }

    /// Edges whose origin is `origin`.
    pub fn outgoing(&self, origin: ObjectId) -> Vec<ObjectId> {
        self.edges()
            .into_iter()
            .filter(|&edge_id| self.edge(edge_id).and_then(|e| e.origin()) == Some(origin))
            .collect()
    }

    /// Edges whose target is `target`.
    pub fn incoming(&self, target: ObjectId) -> Vec<ObjectId> {
        self.edges()
            .into_iter()
            .filter(|&edge_id| self.edge(edge_id).and_then(|e| e.target()) == Some(target))
            .collect()
    }

    /// The nodes reachable from `id` by exactly one edge, in either
    /// direction.
    pub fn neighbours(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut result: Vec<ObjectId> = self
            .outgoing(id)
            .into_iter()
            .filter_map(|edge_id| self.edge(edge_id).and_then(|e| e.target()))
            .chain(
                self.incoming(id)
                    .into_iter()
                    .filter_map(|edge_id| self.edge(edge_id).and_then(|e| e.origin())),
            )
            .collect();
        result.sort();
        result.dedup();
        result
    }

    pub fn select_nodes(&self, predicate: &Predicate) -> Vec<ObjectId> {
        self.nodes()
            .into_iter()
            .filter(|&id| self.node(id).map(|o| predicate.matches(o)).unwrap_or(false))
            .collect()
    }

    pub fn select_edges(&self, predicate: &Predicate) -> Vec<ObjectId> {
        self.edges()
            .into_iter()
            .filter(|&id| self.edge(id).map(|o| predicate.matches(o)).unwrap_or(false))
            .collect()
    }

    /// The filtered edges around `node_id` in `selector.direction`, and the
    /// nodes at their opposite endpoints.
    pub fn hood(&self, node_id: ObjectId, selector: &Selector) -> Neighborhood {
        let candidate_edges = match selector.direction {
            Direction::Outgoing => self.outgoing(node_id),
            Direction::Incoming => self.incoming(node_id),
        };
        let edges: Vec<ObjectId> = candidate_edges
            .into_iter()
            .filter(|&edge_id| self.edge(edge_id).map(|o| selector.predicate.matches(o)).unwrap_or(false))
            .collect();
        let nodes = edges
            .iter()
            .filter_map(|&edge_id| {
                let edge = self.edge(edge_id)?;
                match selector.direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.origin(),
                }
            })
            .collect();
        Neighborhood { edges, nodes }
    }

    /// Nodes with no incoming edge.
    pub fn roots(&self) -> Vec<ObjectId> {
        self.nodes().into_iter().filter(|&id| self.incoming(id).is_empty()).collect()
    }

    /// Nodes with no outgoing edge.
    pub fn leaves(&self) -> Vec<ObjectId> {
        self.nodes().into_iter().filter(|&id| self.outgoing(id).is_empty()).collect()
    }

    /// Topologically order `nodes`, inferring edges as every edge in this
    /// frame whose origin and target are both within `nodes`. Ties break by
    /// ascending object id for reproducibility.
    pub fn topological_sort(&self, nodes: &[ObjectId]) -> Result<Vec<ObjectId>, GraphCycle> {
        let node_set: HashSet<ObjectId> = nodes.iter().copied().collect();
        let mut adjacency: HashMap<ObjectId, Vec<ObjectId>> = HashMap::new();
        let mut in_degree: HashMap<ObjectId, usize> = node_set.iter().map(|&id| (id, 0)).collect();
        let mut relevant_edges = Vec::new();

        for edge_id in self.edges() {
            let edge = self.edge(edge_id).expect("just listed as an edge");
            if let (Some(origin), Some(target)) = (edge.origin(), edge.target()) {
                if node_set.contains(&origin) && node_set.contains(&target) {
                    adjacency.entry(origin).or_default().push(target);
                    *in_degree.entry(target).or_insert(0) += 1;
                    relevant_edges.push(edge_id);
                }
            }
        }
        for successors in adjacency.values_mut() {
            successors.sort();
        }

        let mut ready: BTreeSet<ObjectId> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(&id, _)| id)
            .collect();
        let mut order = Vec::with_capacity(node_set.len());

        while let Some(next) = ready.pop_first() {
            order.push(next);
            if let Some(successors) = adjacency.get(&next) {
                for &successor in successors {
                    let degree = in_degree.get_mut(&successor).expect("tracked above");
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(successor);
                    }
                }
            }
        }

        if order.len() != node_set.len() {
            let resolved: HashSet<ObjectId> = order.into_iter().collect();
            let back_edges: Vec<ObjectId> = relevant_edges
                .into_iter()
                .filter(|&edge_id| {
                    let edge = self.edge(edge_id).expect("just listed as an edge");
                    let target = edge.target().expect("edges have targets");
                    !resolved.contains(&target)
                })
                .collect();
            trace!(cycle_edges = back_edges.len(), "topological_sort: cycle detected");
            return Err(GraphCycle { back_edges });
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap as StdHashMap;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use stratum_core::{Memory, StructuralComponent};
    use stratum_metamodel::{Metamodel, ObjectType};

    use super::*;

    fn wire_graph(edges: &[(ObjectId, ObjectId)]) -> (Memory, stratum_value::FrameId) {
        let node_ty = Arc::new(ObjectType::new("Node", StructuralKind::Node));
        let edge_ty = Arc::new(ObjectType::new("Parameter", StructuralKind::Edge));
        let mut mem = Memory::new(
            Metamodel::new()
                .with_type((*node_ty).clone())
                .with_type((*edge_ty).clone()),
        )
        .unwrap();
        let frame_id = mem.create_frame(None);

        let mut wanted_nodes = HashSet::new();
        for (a, b) in edges {
            wanted_nodes.insert(*a);
            wanted_nodes.insert(*b);
        }
        let mut node_ids: Vec<ObjectId> = wanted_nodes.into_iter().collect();
        node_ids.sort();
        for id in node_ids {
            let snap = mem
                .create_snapshot(node_ty.clone(), Some(id), None, StdHashMap::new(), None, stratum_core::SnapshotState::Transient)
                .unwrap();
            mem.insert_owned(frame_id, id, snap);
        }
        for (origin, target) in edges {
            let structure = StructuralComponent::Edge {
                origin: *origin,
                target: *target,
            };
            let snap = mem
                .create_snapshot(edge_ty.clone(), None, None, StdHashMap::new(), Some(structure), stratum_core::SnapshotState::Transient)
                .unwrap();
            let edge_object_id = mem.snapshot(snap).object_id;
            mem.insert_owned(frame_id, edge_object_id, snap);
        }

        (mem, frame_id)
    }

    #[test]
    fn topological_sort_orders_a_chain() {
        let a = ObjectId::new(1);
        let b = ObjectId::new(2);
        let c = ObjectId::new(3);
        let (mem, frame_id) = wire_graph(&[(a, b), (b, c)]);
        let view = mem.view_mutable_frame(frame_id).unwrap();
        let graph = GraphView::new(&view);

        let order = graph.topological_sort(&[b, c, a]).unwrap();
        assert_eq!(order, vec![a, b, c]);
    }

    #[test]
    fn topological_sort_detects_a_cycle() {
        let a = ObjectId::new(1);
        let b = ObjectId::new(2);
        let c = ObjectId::new(3);
        let (mem, frame_id) = wire_graph(&[(a, b), (b, c), (c, a)]);
        let view = mem.view_mutable_frame(frame_id).unwrap();
        let graph = GraphView::new(&view);

        let result = graph.topological_sort(&[a, b, c]);
        assert!(result.is_err());
    }

    #[test]
    fn roots_and_leaves_of_a_chain() {
        let a = ObjectId::new(1);
        let b = ObjectId::new(2);
        let c = ObjectId::new(3);
        let (mem, frame_id) = wire_graph(&[(a, b), (b, c)]);
        let view = mem.view_mutable_frame(frame_id).unwrap();
        let graph = GraphView::new(&view);

        assert_eq!(graph.roots(), vec![a]);
        assert_eq!(graph.leaves(), vec![c]);
    }
}
