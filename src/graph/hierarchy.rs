//! Hierarchy building: a forest of nodes derived from broader/narrower-style
//! relations.
//!
//! Nodes live in a single arena owned by [`Forest`]; parent and child links
//! are arena indices, so mutual back-references never form ownership cycles.

use std::collections::{HashMap, HashSet};

use super::{Iri, Resource, TripleSet};
use crate::error::{Rdf2RespecError, Result};
use crate::mapping::Direction;

/// Index of a node inside its [`Forest`].
pub type NodeId = usize;

/// A forest vertex wrapping exactly one resource.
#[derive(Debug, Clone)]
pub struct Node {
    resource: Resource,
    parents: Vec<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(resource: Resource) -> Self {
        Self {
            resource,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// All nodes built from one document, in creation order.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    nodes: Vec<Node>,
    lookup: HashMap<Resource, NodeId>,
}

impl Forest {
    /// Node for `resource`, created on first sight.
    fn obtain(&mut self, resource: &Resource) -> NodeId {
        if let Some(&id) = self.lookup.get(resource) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node::new(resource.clone()));
        self.lookup.insert(resource.clone(), id);
        id
    }

    /// Add the child/parent pair in both directions; repeated links are ignored.
    fn link(&mut self, child: NodeId, parent: NodeId) {
        if self.nodes[child].parents.contains(&parent) {
            return;
        }
        self.nodes[child].parents.push(parent);
        self.nodes[parent].children.push(child);
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn get(&self, resource: &Resource) -> Option<NodeId> {
        self.lookup.get(resource).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate()
    }

    /// Nodes without parents, in creation order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_root())
            .map(|(id, _)| id)
    }

    /// Indented outline of the forest, two spaces per level.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        let mut path = Vec::new();
        for root in self.roots() {
            self.write_tree(root, 0, &mut path, &mut out);
        }
        out
    }

    fn write_tree(&self, id: NodeId, level: usize, path: &mut Vec<NodeId>, out: &mut String) {
        out.push_str(&"  ".repeat(level));
        out.push_str(&self.nodes[id].resource.to_string());
        out.push('\n');

        path.push(id);
        for &child in &self.nodes[id].children {
            if !path.contains(&child) {
                self.write_tree(child, level + 1, path, out);
            }
        }
        path.pop();
    }
}

/// Fail unless `direction` has a builder.
pub fn ensure_supported(direction: Direction) -> Result<()> {
    match direction {
        Direction::Upward => Ok(()),
        Direction::Downward => Err(Rdf2RespecError::UnsupportedDirection(direction)),
    }
}

/// Build the forest induced by `predicates` over `triples`.
pub fn build(triples: &TripleSet, predicates: &[Iri], direction: Direction) -> Result<Forest> {
    match direction {
        Direction::Upward => Ok(build_upward(triples, predicates)),
        Direction::Downward => Err(Rdf2RespecError::UnsupportedDirection(direction)),
    }
}

/// `(child, predicate, parent)`: the subject sits beneath the object.
fn build_upward(triples: &TripleSet, predicates: &[Iri]) -> Forest {
    let predicates: HashSet<&Iri> = predicates.iter().collect();

    // Group hierarchy edges by subject once, keeping first-seen subject order.
    let mut subjects: Vec<&Resource> = Vec::new();
    let mut parents_of: HashMap<&Resource, Vec<&Resource>> = HashMap::new();
    for triple in triples.iter() {
        if !predicates.contains(&triple.predicate) {
            continue;
        }
        let parents = parents_of.entry(&triple.subject).or_insert_with(|| {
            subjects.push(&triple.subject);
            Vec::new()
        });
        // Literal objects cannot be parents.
        if let Some(parent) = triple.object.as_resource() {
            parents.push(parent);
        }
    }

    let mut forest = Forest::default();
    for subject in subjects {
        let child = forest.obtain(subject);
        for parent in &parents_of[subject] {
            let parent = forest.obtain(parent);
            forest.link(child, parent);
        }
    }

    log::debug!(
        "Built hierarchy with {} nodes ({} roots)",
        forest.len(),
        forest.roots().count()
    );
    forest
}
