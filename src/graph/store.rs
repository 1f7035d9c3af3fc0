//! In-memory triple set with set semantics and first-seen iteration order.

use std::collections::{HashMap, HashSet};

use super::{Iri, Object, Resource, Triple};

/// Unordered collection of triples; duplicates collapse, iteration follows
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct TripleSet {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
    by_subject: HashMap<Resource, Vec<usize>>,
}

impl TripleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple. Returns `false` if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }
        let index = self.triples.len();
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .push(index);
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> + '_ {
        self.triples.iter()
    }

    /// All triples with the given subject, in insertion order.
    pub fn about<'a>(&'a self, subject: &Resource) -> impl Iterator<Item = &'a Triple> + 'a {
        self.by_subject
            .get(subject)
            .into_iter()
            .flatten()
            .map(move |&index| &self.triples[index])
    }

    /// Objects of `(subject, predicate, ?)`. The iterator borrows only the set.
    pub fn objects<'a>(
        &'a self,
        subject: &Resource,
        predicate: &Iri,
    ) -> impl Iterator<Item = &'a Object> + 'a {
        let predicate = predicate.clone();
        self.about(subject)
            .filter(move |triple| triple.predicate == predicate)
            .map(|triple| &triple.object)
    }

    /// First literal value of `(subject, predicate, ?)`.
    pub fn first_literal(&self, subject: &Resource, predicate: &Iri) -> Option<&str> {
        self.objects(subject, predicate)
            .find_map(Object::as_literal)
            .map(|literal| literal.lexical.as_str())
    }

    /// Distinct predicates used on `subject`, in first-seen order.
    pub fn predicates_of(&self, subject: &Resource) -> Vec<&Iri> {
        let mut seen = HashSet::new();
        self.about(subject)
            .map(|triple| &triple.predicate)
            .filter(|predicate| seen.insert(*predicate))
            .collect()
    }

    /// Distinct subjects in first-seen order.
    pub fn subjects(&self) -> impl Iterator<Item = &Resource> + '_ {
        let mut seen = HashSet::new();
        self.triples
            .iter()
            .map(|triple| &triple.subject)
            .filter(move |subject| seen.insert(*subject))
    }

    /// Merge another document's triples, renaming its blank nodes into
    /// `scope` so they cannot collide with blank nodes already present.
    pub fn merge_scoped(&mut self, other: TripleSet, scope: &str) {
        let rescope = |resource: Resource| match resource {
            Resource::BlankNode(id) => Resource::BlankNode(format!("{}_{}", scope, id)),
            iri => iri,
        };
        for triple in other.triples {
            let object = match triple.object {
                Object::Resource(resource) => Object::Resource(rescope(resource)),
                literal => literal,
            };
            self.insert(Triple {
                subject: rescope(triple.subject),
                predicate: triple.predicate,
                object,
            });
        }
    }
}

impl FromIterator<Triple> for TripleSet {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut set = TripleSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Triple> for TripleSet {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}
