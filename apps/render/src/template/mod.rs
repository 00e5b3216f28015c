//! Template Composer: base templates parsed once into literal, placeholder and
//! section-region nodes, then filled in fixed or dynamic mode.

pub mod compose;
pub mod preprocess;

use std::collections::HashMap;

use crate::errors::TemplateError;

pub use compose::compose;
pub use preprocess::preprocess;

/// First line of the span replaced by dynamically ordered sections.
pub const SECTION_REGION_START: &str = "%-----------EDUCATION-----------";
/// The section region runs up to, but not including, this marker.
pub const DOCUMENT_END: &str = r"\end{document}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateEngine {
    Latex,
}

impl std::str::FromStr for TemplateEngine {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latex" => Ok(TemplateEngine::Latex),
            other => Err(TemplateError::UnsupportedEngine(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    /// A `{{NAME}}` token.
    Placeholder(String),
    /// The section region; its own nodes are used in fixed mode.
    Region(Vec<Node>),
}

/// A preprocessed, parsed base template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDefinition {
    pub engine: TemplateEngine,
    nodes: Vec<Node>,
}

impl TemplateDefinition {
    /// Preprocesses and parses raw template text.
    ///
    /// Fails if the text has more than one section region or an unclosed one.
    /// A template without any region is accepted; see
    /// [`require_section_region`](Self::require_section_region).
    pub fn parse(raw: &str, engine: &str) -> Result<Self, TemplateError> {
        let engine: TemplateEngine = engine.parse()?;
        let text = preprocess(raw);

        let starts = text.matches(SECTION_REGION_START).count();
        if starts > 1 {
            return Err(TemplateError::DuplicateSectionRegion { count: starts });
        }

        let nodes = match text.find(SECTION_REGION_START) {
            None => parse_placeholders(&text),
            Some(start) => {
                let len = text[start..]
                    .find(DOCUMENT_END)
                    .ok_or(TemplateError::UnterminatedSectionRegion { end: DOCUMENT_END })?;
                let end = start + len;

                let mut nodes = parse_placeholders(&text[..start]);
                nodes.push(Node::Region(parse_placeholders(&text[start..end])));
                nodes.extend(parse_placeholders(&text[end..]));
                nodes
            }
        };

        Ok(Self { engine, nodes })
    }

    pub fn has_section_region(&self) -> bool {
        self.nodes.iter().any(|n| matches!(n, Node::Region(_)))
    }

    /// Validates that dynamic section ordering can be used with this template.
    pub fn require_section_region(&self) -> Result<(), TemplateError> {
        if self.has_section_region() {
            Ok(())
        } else {
            Err(TemplateError::MissingSectionRegion {
                marker: SECTION_REGION_START,
            })
        }
    }

    /// Placeholder names in document order, including those inside the region.
    pub fn placeholders(&self) -> Vec<&str> {
        fn collect<'a>(nodes: &'a [Node], out: &mut Vec<&'a str>) {
            for node in nodes {
                match node {
                    Node::Placeholder(name) => out.push(name),
                    Node::Region(inner) => collect(inner, out),
                    Node::Text(_) => {}
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.nodes, &mut out);
        out
    }

    /// Walks the nodes. Placeholders missing from `vars` are written back
    /// verbatim. With `region`, the whole section region is replaced by it.
    pub(crate) fn render(&self, vars: &HashMap<&str, String>, region: Option<&str>) -> String {
        let mut out = String::new();
        write_nodes(&self.nodes, vars, region, &mut out);
        out
    }
}

fn write_nodes(
    nodes: &[Node],
    vars: &HashMap<&str, String>,
    region: Option<&str>,
    out: &mut String,
) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Placeholder(name) => match vars.get(name.as_str()) {
                Some(value) => out.push_str(value),
                None => {
                    out.push_str("{{");
                    out.push_str(name);
                    out.push_str("}}");
                }
            },
            Node::Region(inner) => match region {
                Some(replacement) => out.push_str(replacement),
                None => write_nodes(inner, vars, None, out),
            },
        }
    }
}

/// Splits text into literal runs and `{{NAME}}` placeholders.
fn parse_placeholders(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        let after = &rest[open + 2..];
        let name = after.find("}}").map(|close| &after[..close]);

        match name {
            Some(name) if is_placeholder_name(name) => {
                literal.push_str(&rest[..open]);
                if !literal.is_empty() {
                    nodes.push(Node::Text(std::mem::take(&mut literal)));
                }
                nodes.push(Node::Placeholder(name.to_string()));
                rest = &after[name.len() + 2..];
            }
            // `{{{NAME}}}` must still find the token one brace later.
            _ => {
                literal.push_str(&rest[..open + 1]);
                rest = &rest[open + 1..];
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        nodes.push(Node::Text(literal));
    }
    nodes
}

fn is_placeholder_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
