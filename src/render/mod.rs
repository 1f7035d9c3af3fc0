//! ReSpec Markdown rendering of a hierarchy forest.
//!
//! Every node becomes one section: heading, attribute rows, issue markers,
//! then its children one level deeper. The order of those parts is fixed;
//! ReSpec tooling downstream depends on it.

mod anchor;

pub use anchor::{section_anchor, section_link};

use std::collections::HashSet;

use crate::graph::{Forest, Iri, NodeId, Object, Resource, TripleSet};
use crate::mapping::BoundMapping;

/// Markdown has no heading level beyond 6; deeper sections are emitted at 6.
pub const MAX_HEADING_LEVEL: usize = 6;

/// Separator between multiple values of one attribute.
const VALUE_SEPARATOR: &str = ";\n";

/// Renders sections for one document's triples under a bound mapping.
pub struct SectionRenderer<'a> {
    triples: &'a TripleSet,
    mapping: &'a BoundMapping,
}

impl<'a> SectionRenderer<'a> {
    pub fn new(triples: &'a TripleSet, mapping: &'a BoundMapping) -> Self {
        Self { triples, mapping }
    }

    /// Render every root at depth 1, in node creation order, joined by blank lines.
    pub fn render_forest(&self, forest: &Forest) -> String {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        let blocks: Vec<String> = forest
            .roots()
            .map(|root| self.render_node(forest, root, 1, &mut path, &mut visited))
            .collect();

        let unreachable = forest.len() - visited.len();
        if unreachable > 0 {
            log::warn!(
                "{} hierarchy node(s) are not reachable from any root and were not rendered",
                unreachable
            );
        }

        blocks.join("\n")
    }

    /// Render `node` and its descendants, starting at heading level `depth`.
    pub fn render(&self, forest: &Forest, node: NodeId, depth: usize) -> String {
        self.render_node(forest, node, depth, &mut Vec::new(), &mut HashSet::new())
    }

    fn render_node(
        &self,
        forest: &Forest,
        id: NodeId,
        depth: usize,
        path: &mut Vec<NodeId>,
        visited: &mut HashSet<NodeId>,
    ) -> String {
        visited.insert(id);
        let node = forest.node(id);

        path.push(id);
        let mut children = Vec::with_capacity(node.children().len());
        for &child in node.children() {
            if path.contains(&child) {
                log::warn!(
                    "Skipping {} under {}: hierarchy cycle",
                    forest.node(child).resource(),
                    node.resource()
                );
                continue;
            }
            children.push(self.render_node(forest, child, depth + 1, path, visited));
        }
        path.pop();

        format!("{}\n{}", self.section(node.resource(), depth), children.join("\n"))
    }

    /// Heading, attributes and issues of a single resource.
    pub fn section(&self, resource: &Resource, depth: usize) -> String {
        let mut out = String::new();
        self.write_heading(&mut out, resource, depth);
        self.write_attributes(&mut out, resource);
        self.write_issues(&mut out, resource);
        out
    }

    fn write_heading(&self, out: &mut String, resource: &Resource, depth: usize) {
        let level = depth.clamp(1, MAX_HEADING_LEVEL);
        out.push_str(&"#".repeat(level));
        out.push(' ');
        out.push_str(&self.title(resource));
    }

    fn title(&self, resource: &Resource) -> String {
        if let Some(title) = self.triples.first_literal(resource, &self.mapping.title_predicate) {
            return title.to_string();
        }
        match resource.local_name() {
            Some(local) => local.to_string(),
            None => resource.to_string(),
        }
    }

    fn write_attributes(&self, out: &mut String, resource: &Resource) {
        if self.mapping.attributes.is_empty() {
            for predicate in self.triples.predicates_of(resource) {
                let label = predicate.local_name().unwrap_or(predicate.as_str());
                self.write_attribute(out, resource, predicate, label);
            }
        } else {
            for binding in &self.mapping.attributes {
                self.write_attribute(out, resource, &binding.predicate, &binding.label);
            }
        }
    }

    fn write_attribute(&self, out: &mut String, resource: &Resource, predicate: &Iri, label: &str) {
        let values: Vec<String> = self
            .triples
            .objects(resource, predicate)
            .map(|object| self.value(object))
            .collect();

        out.push('\n');
        out.push_str(&format!("**{}**: {}", label, values.join(VALUE_SEPARATOR)));
        out.push('\n');
    }

    /// Titled resources become links to their section; everything else is raw text.
    fn value(&self, object: &Object) -> String {
        if let Some(target) = object.as_resource() {
            if let Some(title) = self.triples.first_literal(target, &self.mapping.title_predicate) {
                return section_link(title);
            }
        }
        object.text().to_string()
    }

    fn write_issues(&self, out: &mut String, resource: &Resource) {
        let Some(issues) = &self.mapping.issues else {
            return;
        };

        for issue in self.triples.objects(resource, &issues.predicate) {
            let Some(issue) = issue.as_resource() else {
                continue;
            };
            for id in self.triples.objects(issue, &issues.id_predicate) {
                out.push_str(&format!(
                    "\n<{tag} class=\"issue\" data-number=\"{id}\"></{tag}>\n",
                    tag = issues.tag,
                    id = id.text()
                ));
            }
        }
    }
}

/// Render a whole document: every root section, concatenated.
pub fn render_document(forest: &Forest, triples: &TripleSet, mapping: &BoundMapping) -> String {
    SectionRenderer::new(triples, mapping).render_forest(forest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build, Triple};
    use crate::mapping::{AttributeBinding, BoundHierarchy, Direction, IssueBinding};
    use pulldown_cmark::{Event, Parser as CmarkParser, Tag, TagEnd};

    fn ex(local: &str) -> Resource {
        Resource::iri(format!("http://ex.org/{}", local))
    }

    fn p(local: &str) -> Iri {
        Iri::new(format!("http://ex.org/{}", local))
    }

    fn edge(child: &str, parent: &str) -> Triple {
        Triple::new(ex(child), p("broaderThan"), ex(parent))
    }

    fn title(subject: &str, value: &str) -> Triple {
        Triple::new(ex(subject), p("title"), Object::literal(value))
    }

    fn mapping(attributes: Vec<(&str, &str)>) -> BoundMapping {
        BoundMapping {
            hierarchy: BoundHierarchy {
                direction: Direction::Upward,
                predicates: vec![p("broaderThan")],
            },
            title_predicate: p("title"),
            attributes: attributes
                .into_iter()
                .map(|(label, predicate)| AttributeBinding {
                    label: label.to_string(),
                    predicate: p(predicate),
                })
                .collect(),
            issues: Some(IssueBinding {
                predicate: p("hasIssue"),
                id_predicate: p("issueId"),
                tag: "aside".to_string(),
            }),
        }
    }

    fn render(triples: &TripleSet, mapping: &BoundMapping) -> String {
        let forest = build(triples, &mapping.hierarchy.predicates, Direction::Upward).unwrap();
        render_document(&forest, triples, mapping)
    }

    /// (level, text) of every heading in rendered Markdown.
    fn headings(markdown: &str) -> Vec<(usize, String)> {
        let mut out = Vec::new();
        let mut current: Option<(usize, String)> = None;
        for event in CmarkParser::new(markdown) {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    current = Some((level as usize, String::new()));
                }
                Event::Text(text) => {
                    if let Some((_, ref mut heading)) = current {
                        heading.push_str(&text);
                    }
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(heading) = current.take() {
                        out.push(heading);
                    }
                }
                _ => {}
            }
        }
        out
    }

    #[test]
    fn test_chain_renders_nested_sections() {
        let triples: TripleSet = vec![edge("A", "B"), edge("B", "C")].into_iter().collect();
        let output = render(&triples, &mapping(vec![]));
        assert_eq!(
            output,
            "# C\n\
             ## B\n**broaderThan**: http://ex.org/C\n\n\
             ### A\n**broaderThan**: http://ex.org/B\n\n"
        );
        assert_eq!(
            headings(&output),
            vec![
                (1, "C".to_string()),
                (2, "B".to_string()),
                (3, "A".to_string())
            ]
        );
    }

    #[test]
    fn test_subtree_from_inner_node() {
        let triples: TripleSet = vec![edge("A", "B"), edge("B", "C"), edge("D", "B")]
            .into_iter()
            .collect();
        let m = mapping(vec![("Title", "title")]);
        let forest = build(&triples, &m.hierarchy.predicates, Direction::Upward).unwrap();
        let b = forest.get(&ex("B")).unwrap();

        let output = SectionRenderer::new(&triples, &m).render(&forest, b, 3);
        assert_eq!(
            headings(&output),
            vec![
                (3, "B".to_string()),
                (4, "A".to_string()),
                (4, "D".to_string())
            ]
        );
        assert!(!output.contains("# C"));
    }

    #[test]
    fn test_cross_reference_link() {
        let triples: TripleSet = vec![
            title("A", "Alpha"),
            title("B", "Beta"),
            Triple::new(ex("A"), p("seeAlso"), ex("B")),
            edge("A", "Root"),
        ]
        .into_iter()
        .collect();
        let output = render(&triples, &mapping(vec![("seeAlso", "seeAlso")]));
        assert!(output.contains("**seeAlso**: [Beta](#beta)\n"));
        assert!(output.contains("## Alpha\n"));
    }

    #[test]
    fn test_anchor_in_link_is_slugged() {
        let triples: TripleSet = vec![
            title("A", "Alpha"),
            title("B", "Hello, World!"),
            Triple::new(ex("A"), p("seeAlso"), ex("B")),
            edge("A", "Root"),
        ]
        .into_iter()
        .collect();
        let output = render(&triples, &mapping(vec![("See", "seeAlso")]));
        assert!(output.contains("**See**: [Hello, World!](#hello-world)"));
    }

    #[test]
    fn test_heading_falls_back_to_local_name() {
        let widget = Resource::iri("http://ex.org/ns#Widget123");
        let triples: TripleSet = vec![Triple::new(widget.clone(), p("broaderThan"), ex("Parts"))]
            .into_iter()
            .collect();
        let m = mapping(vec![]);
        let renderer = SectionRenderer::new(&triples, &m);
        assert!(renderer.section(&widget, 2).starts_with("## Widget123\n"));
    }

    #[test]
    fn test_heading_falls_back_to_blank_node_id() {
        let bnode = Resource::blank("b7");
        let triples: TripleSet = vec![Triple::new(bnode.clone(), p("broaderThan"), ex("Parts"))]
            .into_iter()
            .collect();
        let m = mapping(vec![]);
        let renderer = SectionRenderer::new(&triples, &m);
        assert!(renderer.section(&bnode, 1).starts_with("# _:b7\n"));
    }

    #[test]
    fn test_issue_markup() {
        let triples: TripleSet = vec![
            title("A", "Alpha"),
            Triple::new(ex("A"), p("hasIssue"), ex("Iss1")),
            Triple::new(ex("Iss1"), p("issueId"), Object::literal("42")),
        ]
        .into_iter()
        .collect();
        let m = mapping(vec![("Note", "note")]);
        let section = SectionRenderer::new(&triples, &m).section(&ex("A"), 1);
        assert_eq!(
            section,
            "# Alpha\n**Note**: \n\n<aside class=\"issue\" data-number=\"42\"></aside>\n"
        );
    }

    #[test]
    fn test_custom_issue_tag() {
        let triples: TripleSet = vec![
            Triple::new(ex("A"), p("hasIssue"), ex("Iss1")),
            Triple::new(ex("Iss1"), p("issueId"), Object::literal("7")),
        ]
        .into_iter()
        .collect();
        let mut m = mapping(vec![("Note", "note")]);
        if let Some(issues) = m.issues.as_mut() {
            issues.tag = "div".to_string();
        }
        let section = SectionRenderer::new(&triples, &m).section(&ex("A"), 1);
        assert!(section.contains("<div class=\"issue\" data-number=\"7\"></div>"));
    }

    #[test]
    fn test_empty_attribute_still_emitted() {
        let triples: TripleSet = vec![title("A", "Alpha")].into_iter().collect();
        let m = mapping(vec![("Definition", "definition"), ("Example", "example")]);
        let section = SectionRenderer::new(&triples, &m).section(&ex("A"), 1);
        assert_eq!(section, "# Alpha\n**Definition**: \n\n**Example**: \n");
    }

    #[test]
    fn test_multiple_values_joined() {
        let triples: TripleSet = vec![
            Triple::new(ex("A"), p("alias"), Object::literal("one")),
            Triple::new(ex("A"), p("alias"), Object::literal("two")),
        ]
        .into_iter()
        .collect();
        let m = mapping(vec![("Alias", "alias")]);
        let section = SectionRenderer::new(&triples, &m).section(&ex("A"), 1);
        assert!(section.contains("**Alias**: one;\ntwo\n"));
    }

    #[test]
    fn test_attribute_order_follows_bindings() {
        let triples: TripleSet = vec![
            Triple::new(ex("A"), p("second"), Object::literal("2")),
            Triple::new(ex("A"), p("first"), Object::literal("1")),
        ]
        .into_iter()
        .collect();
        let m = mapping(vec![("First", "first"), ("Second", "second")]);
        let section = SectionRenderer::new(&triples, &m).section(&ex("A"), 1);
        let first = section.find("**First**").unwrap();
        let second = section.find("**Second**").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_section_count_matches_resources() {
        let triples: TripleSet = vec![
            edge("a1", "a"),
            edge("a2", "a"),
            edge("a21", "a2"),
            edge("b1", "b"),
        ]
        .into_iter()
        .collect();
        let output = render(&triples, &mapping(vec![("Title", "title")]));
        assert_eq!(headings(&output).len(), 6);
    }

    #[test]
    fn test_multi_parent_rendered_under_each_parent() {
        let triples: TripleSet = vec![
            title("shared", "Shared"),
            edge("shared", "P1"),
            edge("shared", "P2"),
        ]
        .into_iter()
        .collect();
        let output = render(&triples, &mapping(vec![("Title", "title")]));
        let shared: Vec<_> = headings(&output)
            .into_iter()
            .filter(|(_, text)| text == "Shared")
            .collect();
        assert_eq!(shared, vec![(2, "Shared".to_string()), (2, "Shared".to_string())]);
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let triples: TripleSet = vec![
            title("A", "Alpha"),
            edge("A", "B"),
            edge("C", "B"),
            Triple::new(ex("C"), p("seeAlso"), ex("A")),
        ]
        .into_iter()
        .collect();
        let m = mapping(vec![]);
        assert_eq!(render(&triples, &m), render(&triples, &m));
    }

    #[test]
    fn test_cycle_below_root_terminates() {
        let triples: TripleSet = vec![edge("A", "R"), edge("B", "A"), edge("A", "B")]
            .into_iter()
            .collect();
        let output = render(&triples, &mapping(vec![("Title", "title")]));
        let levels: Vec<_> = headings(&output).into_iter().map(|(level, _)| level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
    }

    #[test]
    fn test_deep_headings_clamped() {
        let triples: TripleSet = TripleSet::new();
        let m = mapping(vec![("Title", "title")]);
        let section = SectionRenderer::new(&triples, &m).section(&ex("Deep"), 9);
        assert!(section.starts_with("###### Deep\n"));
    }

    #[test]
    fn test_roots_joined_with_blank_line() {
        let triples: TripleSet = vec![edge("A", "R1"), edge("B", "R2")].into_iter().collect();
        let output = render(&triples, &mapping(vec![("Title", "title")]));
        assert!(output.contains("# R1\n**Title**: \n\n## A\n**Title**: \n\n\n# R2\n"));
    }
}
