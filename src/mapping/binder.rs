//! Resolve a raw mapping into concrete predicate IRIs.

use super::{Direction, ParagraphType, RespecMapping, DEFAULT_ISSUE_TAG};
use crate::error::{Rdf2RespecError, Result};
use crate::graph::{resolve, Iri, PrefixTable};

/// Hierarchy relation with resolved predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundHierarchy {
    pub direction: Direction,
    pub predicates: Vec<Iri>,
}

/// One labeled attribute row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBinding {
    pub label: String,
    pub predicate: Iri,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueBinding {
    pub predicate: Iri,
    pub id_predicate: Iri,
    pub tag: String,
}

/// Ready-to-use mapping. Empty `attributes` means every predicate on a
/// resource is rendered, labeled by its local name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundMapping {
    pub hierarchy: BoundHierarchy,
    pub title_predicate: Iri,
    pub attributes: Vec<AttributeBinding>,
    pub issues: Option<IssueBinding>,
}

/// Bind `raw` against `prefixes`. Any unresolvable name is fatal and names
/// the offending field.
pub fn bind(raw: &RespecMapping, prefixes: &PrefixTable) -> Result<BoundMapping> {
    match &raw.paragraph_type {
        ParagraphType::Hierarchical => {}
        ParagraphType::Unsupported(name) => {
            return Err(Rdf2RespecError::UnsupportedMappingType(name.clone()));
        }
    }

    let relation = raw.hierarchical_relation.as_ref().ok_or_else(|| {
        Rdf2RespecError::Config("hierarchical mapping requires hierarchicalRelation".to_string())
    })?;
    if relation.predicates.is_empty() {
        return Err(Rdf2RespecError::Config(
            "hierarchicalRelation.predicates must not be empty".to_string(),
        ));
    }
    let predicates = relation
        .predicates
        .iter()
        .map(|name| resolve_field("hierarchicalRelation.predicates", name, prefixes))
        .collect::<Result<Vec<_>>>()?;

    let title_predicate =
        resolve_field("sectionTitlePredicate", &raw.section_title_predicate, prefixes)?;

    let attributes = raw
        .attribute_mapping
        .iter()
        .map(|(label, predicate)| {
            let field = format!("attributeMapping.{}", label);
            Ok(AttributeBinding {
                label: label.to_string(),
                predicate: resolve_field(&field, predicate, prefixes)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let issues = match &raw.issue_mapping {
        Some(mapping) => {
            let tag = mapping.issue_html_tag.trim();
            Some(IssueBinding {
                predicate: resolve_field(
                    "issueMapping.issuePredicate",
                    &mapping.issue_predicate,
                    prefixes,
                )?,
                id_predicate: resolve_field(
                    "issueMapping.issueIdPredicate",
                    &mapping.issue_id_predicate,
                    prefixes,
                )?,
                tag: if tag.is_empty() {
                    DEFAULT_ISSUE_TAG.to_string()
                } else {
                    tag.to_string()
                },
            })
        }
        None => None,
    };

    Ok(BoundMapping {
        hierarchy: BoundHierarchy {
            direction: relation.direction,
            predicates,
        },
        title_predicate,
        attributes,
        issues,
    })
}

fn resolve_field(field: &str, value: &str, prefixes: &PrefixTable) -> Result<Iri> {
    resolve(value, prefixes)?.ok_or_else(|| Rdf2RespecError::ConfigResolution {
        field: field.to_string(),
        value: value.to_string(),
    })
}
