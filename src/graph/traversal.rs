//! Predicate-chain traversal: find the resources at the start or end of
//! chains formed by one or more predicates.
//!
//! A cycle along the chain is an error ([`Rdf2RespecError::ChainCycle`]);
//! there is no terminal to report for a loop.
//!
//! Only resource objects continue a chain. A link whose object is a literal
//! is not a step, so the resource holding it is the terminal; the walk never
//! yields an empty set for such a link.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::{Iri, Resource, TripleSet};
use crate::error::{Rdf2RespecError, Result};

/// Where a chain walk starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainStart {
    /// Every subject in the graph (`*`).
    Any,
    Resource(Resource),
}

impl From<Resource> for ChainStart {
    fn from(resource: Resource) -> Self {
        ChainStart::Resource(resource)
    }
}

#[derive(Debug, Clone, Copy)]
enum Walk {
    /// object -> subject
    Backward,
    /// subject -> object
    Forward,
}

/// Resources reached by following `predicates` backwards from `start` until
/// no earlier link exists.
pub fn first_in_chain(
    triples: &TripleSet,
    predicates: &[Iri],
    start: &ChainStart,
) -> Result<BTreeSet<Resource>> {
    resolve_chain(triples, predicates, start, Walk::Backward)
}

/// Resources reached by following `predicates` forwards from `start` until
/// no later link exists.
pub fn last_in_chain(
    triples: &TripleSet,
    predicates: &[Iri],
    start: &ChainStart,
) -> Result<BTreeSet<Resource>> {
    resolve_chain(triples, predicates, start, Walk::Forward)
}

fn resolve_chain(
    triples: &TripleSet,
    predicates: &[Iri],
    start: &ChainStart,
    walk: Walk,
) -> Result<BTreeSet<Resource>> {
    let mut resolver = ChainResolver::new(triples, predicates, walk);

    match start {
        ChainStart::Resource(resource) => resolver.terminals(resource),
        ChainStart::Any => {
            let mut found = BTreeSet::new();
            for subject in triples.subjects() {
                if resolver.has_step(subject) {
                    found.extend(resolver.terminals(subject)?);
                } else {
                    found.insert(subject.clone());
                }
            }
            Ok(found)
        }
    }
}

struct ChainResolver {
    steps: HashMap<Resource, Vec<Resource>>,
    done: HashMap<Resource, BTreeSet<Resource>>,
    on_path: HashSet<Resource>,
}

impl ChainResolver {
    fn new(triples: &TripleSet, predicates: &[Iri], walk: Walk) -> Self {
        let predicates: HashSet<&Iri> = predicates.iter().collect();
        let mut steps: HashMap<Resource, Vec<Resource>> = HashMap::new();

        for triple in triples.iter() {
            if !predicates.contains(&triple.predicate) {
                continue;
            }
            // A chain only continues through resources.
            let Some(object) = triple.object.as_resource() else {
                continue;
            };
            let (from, to) = match walk {
                Walk::Forward => (&triple.subject, object),
                Walk::Backward => (object, &triple.subject),
            };
            let next = steps.entry(from.clone()).or_default();
            if !next.contains(to) {
                next.push(to.clone());
            }
        }

        Self {
            steps,
            done: HashMap::new(),
            on_path: HashSet::new(),
        }
    }

    fn has_step(&self, resource: &Resource) -> bool {
        self.steps.contains_key(resource)
    }

    fn terminals(&mut self, resource: &Resource) -> Result<BTreeSet<Resource>> {
        if let Some(found) = self.done.get(resource) {
            return Ok(found.clone());
        }

        let Some(next) = self.steps.get(resource).cloned() else {
            return Ok(BTreeSet::from([resource.clone()]));
        };

        if !self.on_path.insert(resource.clone()) {
            return Err(Rdf2RespecError::ChainCycle(resource.to_string()));
        }

        let mut found = BTreeSet::new();
        for step in &next {
            found.extend(self.terminals(step)?);
        }

        self.on_path.remove(resource);
        self.done.insert(resource.clone(), found.clone());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Object, Triple};

    fn ex(local: &str) -> Resource {
        Resource::iri(format!("http://ex.org/{}", local))
    }

    fn next() -> Iri {
        Iri::new("http://ex.org/next")
    }

    fn link(from: &str, to: &str) -> Triple {
        Triple::new(ex(from), next(), ex(to))
    }

    fn path_graph() -> TripleSet {
        vec![link("a", "b"), link("b", "c"), link("c", "d")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_last_in_acyclic_path() {
        let found = last_in_chain(&path_graph(), &[next()], &ex("a").into()).unwrap();
        assert_eq!(found, BTreeSet::from([ex("d")]));
    }

    #[test]
    fn test_first_in_acyclic_path() {
        let found = first_in_chain(&path_graph(), &[next()], &ex("d").into()).unwrap();
        assert_eq!(found, BTreeSet::from([ex("a")]));
    }

    #[test]
    fn test_no_matching_predicate_returns_start() {
        let other = Iri::new("http://ex.org/other");
        let start: ChainStart = ex("b").into();
        assert_eq!(
            first_in_chain(&path_graph(), &[other.clone()], &start).unwrap(),
            BTreeSet::from([ex("b")])
        );
        assert_eq!(
            last_in_chain(&path_graph(), &[other], &start).unwrap(),
            BTreeSet::from([ex("b")])
        );
    }

    #[test]
    fn test_branching_chain_returns_all_terminals() {
        let triples: TripleSet = vec![link("a", "b"), link("a", "c"), link("c", "d")]
            .into_iter()
            .collect();
        let found = last_in_chain(&triples, &[next()], &ex("a").into()).unwrap();
        assert_eq!(found, BTreeSet::from([ex("b"), ex("d")]));
    }

    #[test]
    fn test_wildcard_covers_every_subject() {
        let mut triples = path_graph();
        triples.extend(vec![
            link("x", "y"),
            Triple::new(ex("lonely"), Iri::new("http://ex.org/label"), Object::literal("L")),
        ]);

        let last = last_in_chain(&triples, &[next()], &ChainStart::Any).unwrap();
        assert_eq!(last, BTreeSet::from([ex("d"), ex("y"), ex("lonely")]));

        let first = first_in_chain(&triples, &[next()], &ChainStart::Any).unwrap();
        assert_eq!(first, BTreeSet::from([ex("a"), ex("x"), ex("lonely")]));
    }

    #[test]
    fn test_literal_objects_end_the_chain() {
        let triples: TripleSet = vec![
            link("a", "b"),
            Triple::new(ex("b"), next(), Object::literal("end")),
        ]
        .into_iter()
        .collect();
        let found = last_in_chain(&triples, &[next()], &ex("a").into()).unwrap();
        assert_eq!(found, BTreeSet::from([ex("b")]));
    }

    #[test]
    fn test_cycle_is_reported() {
        let triples: TripleSet = vec![link("a", "b"), link("b", "c"), link("c", "a")]
            .into_iter()
            .collect();
        let err = last_in_chain(&triples, &[next()], &ex("a").into()).unwrap_err();
        assert!(matches!(err, Rdf2RespecError::ChainCycle(_)));

        let err = first_in_chain(&triples, &[next()], &ChainStart::Any).unwrap_err();
        assert!(matches!(err, Rdf2RespecError::ChainCycle(_)));
    }

    #[test]
    fn test_shared_tail_is_not_a_cycle() {
        // a -> c, b -> c, c -> d: c is visited twice but never loops.
        let triples: TripleSet = vec![link("a", "c"), link("b", "c"), link("c", "d")]
            .into_iter()
            .collect();
        let found = last_in_chain(&triples, &[next()], &ChainStart::Any).unwrap();
        assert_eq!(found, BTreeSet::from([ex("d")]));
    }
}
