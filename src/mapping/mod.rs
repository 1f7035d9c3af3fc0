//! ReSpec mapping configuration: the raw, declarative form as written in the
//! sources file, and its bound form with every predicate resolved to an IRI.

mod binder;

pub use binder::{bind, AttributeBinding, BoundHierarchy, BoundMapping, IssueBinding};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::graph::PrefixTable;

pub const DEFAULT_ISSUE_TAG: &str = "aside";

/// Paragraph layout selected by a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ParagraphType {
    Hierarchical,
    /// Any other layout name; rejected when the mapping is bound.
    Unsupported(String),
}

impl From<String> for ParagraphType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "hierarchical" => ParagraphType::Hierarchical,
            _ => ParagraphType::Unsupported(value),
        }
    }
}

/// Which way a hierarchy predicate points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `(child, predicate, parent)`
    Upward,
    /// `(parent, predicate, child)`
    Downward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Upward => f.write_str("upward"),
            Direction::Downward => f.write_str("downward"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HierarchicalRelation {
    pub direction: Direction,
    #[serde(default)]
    pub predicates: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueMapping {
    pub issue_predicate: String,
    pub issue_id_predicate: String,
    #[serde(default = "default_issue_tag")]
    pub issue_html_tag: String,
}

fn default_issue_tag() -> String {
    DEFAULT_ISSUE_TAG.to_string()
}

/// Ordered `label -> predicate` pairs, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMapping(pub Vec<(String, String)>);

impl AttributeMapping {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0
            .iter()
            .map(|(label, predicate)| (label.as_str(), predicate.as_str()))
    }
}

impl<'de> Deserialize<'de> for AttributeMapping {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedPairs;

        impl<'de> Visitor<'de> for OrderedPairs {
            type Value = AttributeMapping;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of attribute labels to predicates")
            }

            fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(AttributeMapping::default())
            }

            fn visit_none<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(AttributeMapping::default())
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((label, predicate)) = map.next_entry::<String, String>()? {
                    pairs.push((label, predicate));
                }
                Ok(AttributeMapping(pairs))
            }
        }

        deserializer.deserialize_any(OrderedPairs)
    }
}

/// Declarative mapping from graph relations to ReSpec sections.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespecMapping {
    #[serde(default)]
    pub prefixes: PrefixTable,
    #[serde(alias = "type")]
    pub paragraph_type: ParagraphType,
    #[serde(default)]
    pub hierarchical_relation: Option<HierarchicalRelation>,
    pub section_title_predicate: String,
    #[serde(default)]
    pub attribute_mapping: AttributeMapping,
    #[serde(default)]
    pub issue_mapping: Option<IssueMapping>,
}

impl RespecMapping {
    /// Bind against this mapping's own prefix table.
    pub fn bind(&self) -> crate::error::Result<BoundMapping> {
        bind(self, &self.prefixes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPPING_YAML: &str = r#"
prefixes:
  skos: "http://www.w3.org/2004/02/skos/core#"
  ex: "http://ex.org/ns#"
type: hierarchical
hierarchicalRelation:
  direction: upward
  predicates:
    - skos:broader
sectionTitlePredicate: skos:prefLabel
attributeMapping:
  Definition: skos:definition
  Example: skos:example
  Alias: skos:altLabel
issueMapping:
  issuePredicate: ex:hasIssue
  issueIdPredicate: ex:issueId
"#;

    #[test]
    fn test_mapping_deserializes_in_order() {
        let mapping: RespecMapping = serde_yaml_ng::from_str(MAPPING_YAML).unwrap();
        assert_eq!(mapping.paragraph_type, ParagraphType::Hierarchical);
        let labels: Vec<_> = mapping.attribute_mapping.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Definition", "Example", "Alias"]);
        let relation = mapping.hierarchical_relation.unwrap();
        assert_eq!(relation.direction, Direction::Upward);
        assert_eq!(relation.predicates, vec!["skos:broader".to_string()]);
        let issues = mapping.issue_mapping.unwrap();
        assert_eq!(issues.issue_html_tag, DEFAULT_ISSUE_TAG);
    }

    #[test]
    fn test_paragraph_type_field_name() {
        let yaml = r#"
paragraphType: sequential
sectionTitlePredicate: "http://ex.org/title"
"#;
        let mapping: RespecMapping = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(
            mapping.paragraph_type,
            ParagraphType::Unsupported("sequential".to_string())
        );
        assert!(mapping.attribute_mapping.is_empty());
        assert!(mapping.issue_mapping.is_none());
    }

    #[test]
    fn test_null_attribute_mapping_is_empty() {
        let yaml = r#"
paragraphType: hierarchical
sectionTitlePredicate: "http://ex.org/title"
attributeMapping:
"#;
        let mapping: RespecMapping = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(mapping.attribute_mapping.is_empty());
    }

    #[test]
    fn test_unknown_direction_rejected() {
        let yaml = r#"
direction: sideways
predicates: []
"#;
        assert!(serde_yaml_ng::from_str::<HierarchicalRelation>(yaml).is_err());
    }
}
