//! Graph document parsing (Turtle / N-Triples) into a [`TripleSet`].
//!
//! Blank node labels are kept as the parser reports them, so identity holds
//! within one document. Terms are read from their N-Triples display form.

use sophia::api::prelude::*;
use std::io::{BufReader, Cursor};
use std::path::Path;

use crate::error::{Rdf2RespecError, Result};
use crate::graph::{self, Iri, Literal, Object, Resource, TripleSet};

/// Serialization of an input document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Turtle,
    NTriples,
}

impl GraphFormat {
    /// `nt` selects N-Triples; everything else is read as Turtle.
    pub fn from_extension(extension: &str) -> Self {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "nt" => GraphFormat::NTriples,
            _ => GraphFormat::Turtle,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct TermError(String);

/// Parse a document held in memory. `origin` names it in error messages.
pub fn parse_graph(bytes: &[u8], format: GraphFormat, origin: &str) -> Result<TripleSet> {
    let reader = BufReader::new(Cursor::new(bytes));
    let mut triples = TripleSet::new();

    match format {
        GraphFormat::Turtle => {
            let mut parser = sophia::turtle::parser::turtle::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), TermError> {
                    push_display_triple(
                        &mut triples,
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                    )
                })
                .map_err(|e| Rdf2RespecError::Parse(format!("{}: {}", origin, e)))?;
        }
        GraphFormat::NTriples => {
            let mut parser = sophia::turtle::parser::nt::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), TermError> {
                    push_display_triple(
                        &mut triples,
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                    )
                })
                .map_err(|e| Rdf2RespecError::Parse(format!("{}: {}", origin, e)))?;
        }
    }

    log::debug!("Parsed {} triples from {}", triples.len(), origin);
    Ok(triples)
}

/// Parse Turtle held in memory.
pub fn parse_turtle(bytes: &[u8], origin: &str) -> Result<TripleSet> {
    parse_graph(bytes, GraphFormat::Turtle, origin)
}

/// Read and parse a document; the format follows the file extension.
pub fn read_triples(path: &Path) -> Result<TripleSet> {
    let bytes = std::fs::read(path)?;
    let format = GraphFormat::from_extension(
        path.extension().and_then(|e| e.to_str()).unwrap_or(""),
    );
    parse_graph(&bytes, format, &path.display().to_string())
}

fn push_display_triple(
    triples: &mut TripleSet,
    subject: &str,
    predicate: &str,
    object: &str,
) -> std::result::Result<(), TermError> {
    let subject = parse_resource(subject)?;
    let Resource::Iri(predicate) = parse_resource(predicate)? else {
        return Ok(());
    };
    let object = parse_object(object)?;
    triples.insert(graph::Triple::new(subject, predicate, object));
    Ok(())
}

fn parse_resource(term: &str) -> std::result::Result<Resource, TermError> {
    match parse_object(term)? {
        Object::Resource(resource) => Ok(resource),
        Object::Literal(_) => Err(TermError(format!("expected IRI or blank node, got literal: {}", term))),
    }
}

fn parse_object(term: &str) -> std::result::Result<Object, TermError> {
    let term = term.trim();

    if let Some(iri) = term.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(Object::Resource(Resource::Iri(Iri::new(iri))));
    }
    if let Some(id) = term.strip_prefix("_:") {
        return Ok(Object::Resource(Resource::blank(id)));
    }
    if term.starts_with('"') {
        return parse_literal(term).map(Object::Literal);
    }

    Err(TermError(format!("unsupported RDF term form: {}", term)))
}

fn parse_literal(term: &str) -> std::result::Result<Literal, TermError> {
    let body = &term[1..];
    let mut lexical = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    let mut end = None;

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                end = Some(i);
                break;
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => lexical.push('\n'),
                Some((_, 'r')) => lexical.push('\r'),
                Some((_, 't')) => lexical.push('\t'),
                Some((_, 'b')) => lexical.push('\u{8}'),
                Some((_, 'f')) => lexical.push('\u{c}'),
                Some((_, 'u')) => lexical.push(unicode_escape(&mut chars, 4, term)?),
                Some((_, 'U')) => lexical.push(unicode_escape(&mut chars, 8, term)?),
                Some((_, other)) => lexical.push(other),
                None => lexical.push('\\'),
            },
            c => lexical.push(c),
        }
    }

    let end = end.ok_or_else(|| TermError(format!("invalid literal (missing closing quote): {}", term)))?;
    let rest = body[end + 1..].trim();

    let (language, datatype) = if let Some(language) = rest.strip_prefix('@') {
        (Some(language.to_string()), None)
    } else if let Some(datatype) = rest.strip_prefix("^^") {
        let datatype = datatype.trim();
        let datatype = datatype
            .strip_prefix('<')
            .and_then(|d| d.strip_suffix('>'))
            .unwrap_or(datatype);
        (None, Some(datatype.to_string()))
    } else {
        (None, None)
    };

    Ok(Literal {
        lexical,
        datatype,
        language,
    })
}

fn unicode_escape(
    chars: &mut std::str::CharIndices<'_>,
    digits: usize,
    term: &str,
) -> std::result::Result<char, TermError> {
    let hex: String = chars.by_ref().take(digits).map(|(_, c)| c).collect();
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| TermError(format!("invalid unicode escape in literal: {}", term)))
}
