//! Knowledge graph module: RDF term model, triple store, identifier
//! resolution, hierarchy building and predicate-chain traversal.
//!
//! Resources are compared and hashed by value. Blank node ids are only
//! meaningful inside the document they were parsed from.

mod hierarchy;
mod iri;
mod store;
mod traversal;

pub use hierarchy::{build, ensure_supported, Forest, Node, NodeId};
pub use iri::{is_absolute_iri, resolve, PrefixTable};
pub use store::TripleSet;
pub use traversal::{first_in_chain, last_in_chain, ChainStart};

use std::fmt;

/// An absolute IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local part of the IRI: the text after the last `#`, `/` or `:`.
    ///
    /// Returns `None` when the IRI ends in one of those separators.
    pub fn local_name(&self) -> Option<&str> {
        let iri = self.0.as_str();
        let cut = iri
            .rfind('#')
            .or_else(|| iri.rfind('/'))
            .or_else(|| iri.rfind(':'))?;
        let local = &iri[cut + 1..];
        if local.is_empty() {
            None
        } else {
            Some(local)
        }
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A graph subject: an IRI or a document-scoped blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Iri(Iri),
    BlankNode(String),
}

impl Resource {
    pub fn iri(value: impl Into<String>) -> Self {
        Resource::Iri(Iri::new(value))
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Resource::BlankNode(id.into())
    }

    /// Plain string value: the IRI itself, or the bare blank node id.
    pub fn value(&self) -> &str {
        match self {
            Resource::Iri(iri) => iri.as_str(),
            Resource::BlankNode(id) => id,
        }
    }

    /// Local fragment for IRIs; blank nodes have none.
    pub fn local_name(&self) -> Option<&str> {
        match self {
            Resource::Iri(iri) => iri.local_name(),
            Resource::BlankNode(_) => None,
        }
    }
}

impl From<Iri> for Resource {
    fn from(iri: Iri) -> Self {
        Resource::Iri(iri)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Iri(iri) => write!(f, "{}", iri),
            Resource::BlankNode(id) => write!(f, "_:{}", id),
        }
    }
}

/// A literal value. Datatype and language are kept but rendered as opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl Literal {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }
}

/// Object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Object {
    Resource(Resource),
    Literal(Literal),
}

impl Object {
    pub fn literal(lexical: impl Into<String>) -> Self {
        Object::Literal(Literal::plain(lexical))
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Object::Resource(resource) => Some(resource),
            Object::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Object::Literal(literal) => Some(literal),
            Object::Resource(_) => None,
        }
    }

    /// Raw text value used when an object is rendered without a link.
    pub fn text(&self) -> &str {
        match self {
            Object::Resource(resource) => resource.value(),
            Object::Literal(literal) => &literal.lexical,
        }
    }
}

impl From<Resource> for Object {
    fn from(resource: Resource) -> Self {
        Object::Resource(resource)
    }
}

/// A single statement (subject --predicate--> object).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Resource,
    pub predicate: Iri,
    pub object: Object,
}

impl Triple {
    pub fn new(subject: Resource, predicate: Iri, object: impl Into<Object>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}
