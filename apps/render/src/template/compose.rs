//! Assembles a full document from a resume and a parsed base template.
//!
//! - Fixed mode (no `section_order`): heading and section placeholders are filled in place.
//! - Dynamic mode: heading placeholders are filled, then the section region is
//!   replaced by the ordered sequence of rendered sections.

use std::collections::HashMap;

use tracing::debug;

use crate::errors::TemplateError;
use crate::models::{ResumeDocument, SectionOrder, SectionValue};
use crate::render::records::{certification_block, entry_items, leadership_block, project_items};
use crate::render::{category_lines, heading_vars, render_body, render_section};
use crate::template::TemplateDefinition;

/// Fixed-mode section placeholders and the record section feeding each one.
const SECTION_SLOTS: &[(&str, &str)] = &[
    ("EDUCATION_SECTION", "education"),
    ("EXPERIENCE_SECTION", "experience"),
    ("PROJECTS_SECTION", "projects"),
    ("SKILLS_SECTION", "skills"),
    ("CERTIFICATIONS_SECTION", "certifications"),
    ("LEADERSHIP_SECTION", "leadership"),
];

/// Renders `document` into `template`. The mode is chosen by the presence of
/// `section_order`, regardless of its length.
pub fn compose(
    document: &ResumeDocument,
    template: &TemplateDefinition,
) -> Result<String, TemplateError> {
    match &document.order {
        SectionOrder::Fixed => Ok(compose_fixed(document, template)),
        SectionOrder::Dynamic(order) => compose_dynamic(document, template, order),
    }
}

fn compose_fixed(document: &ResumeDocument, template: &TemplateDefinition) -> String {
    let mut vars = heading_vars(&document.heading);
    for &(slot, section) in SECTION_SLOTS {
        let value = document
            .section(section)
            .map(|v| slot_body(section, v))
            .unwrap_or_default();
        vars.insert(slot, value);
    }

    debug!("Composing fixed-order document ({} slots)", vars.len());
    template.render(&vars, None)
}

fn compose_dynamic(
    document: &ResumeDocument,
    template: &TemplateDefinition,
    order: &[String],
) -> Result<String, TemplateError> {
    template.require_section_region()?;

    let mut sections = String::new();
    let mut rendered = Vec::new();
    for (name, value) in document.ordered_sections(order) {
        let block = render_section(name, value);
        if !block.is_empty() {
            sections.push_str(&block);
            sections.push('\n');
            rendered.push(name);
        }
    }
    sections.push('\n');

    debug!("Composing dynamic-order document: {:?}", rendered);
    let vars: HashMap<&str, String> = heading_vars(&document.heading);
    Ok(template.render(&vars, Some(sections.as_str())))
}

/// Body for one fixed-mode placeholder. The base template supplies headers and
/// list wrappers for the four canonical sections; the two optional sections
/// carry their own `\section` header so they vanish entirely when absent.
fn slot_body(section: &str, value: &SectionValue) -> String {
    match (section, value) {
        ("education" | "experience", SectionValue::RecordList(records)) => entry_items(records),
        ("projects", SectionValue::RecordList(records)) => project_items(records, false),
        ("skills", SectionValue::Categorized(categories)) => category_lines(categories).join("\n"),
        ("certifications", value) => {
            let body = match value {
                SectionValue::RecordList(records) => certification_block(records),
                other => render_body(other),
            };
            format!("\\section{{Certifications}}\n{body}")
        }
        ("leadership", value) => {
            let body = match value {
                SectionValue::RecordList(records) => leadership_block(records),
                other => render_body(other),
            };
            format!("\\section{{Leadership / Extracurricular}}\n{body}")
        }
        (_, other) => render_body(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = r"\documentclass{article}
\begin{document}
\begin{center}
    \textbf{\Huge \scshape {{FULL_NAME}}} \\ \vspace{1pt}
    \small {{PHONE_NUMBER}} $|$ \href{mailto:{{EMAIL_ADDRESS}}}{\underline{{{EMAIL_ADDRESS}}}}{{ADDITIONAL_LINKS}}
\end{center}

%-----------EDUCATION-----------
\section{Education}
  \resumeSubHeadingListStart
{{EDUCATION_SECTION}}
  \resumeSubHeadingListEnd

%-----------PROJECTS-----------
\section{Projects}
    \resumeSubHeadingListStart
{{PROJECTS_SECTION}}
    \resumeSubHeadingListEnd

%-----------SKILLS-----------
\section{Technical Skills}
{{SKILLS_SECTION}}

{{CERTIFICATIONS_SECTION}}
{{LEADERSHIP_SECTION}}
\end{document}
";

    fn template() -> TemplateDefinition {
        TemplateDefinition::parse(BASE, "latex").unwrap()
    }

    fn doc(value: serde_json::Value) -> ResumeDocument {
        ResumeDocument::from_json(&value).unwrap()
    }

    fn resume() -> serde_json::Value {
        json!({
            "heading": {"full_name": "Jake Ryan", "email": "jake@su.edu", "phone": "123-456-7890"},
            "education": [{
                "institution": "Southwestern University",
                "location": "Georgetown, TX",
                "degree": "B.A. Computer Science",
                "date": "Aug. 2018 -- May 2021"
            }],
            "skills": {"categories": [{"name": "Languages", "items": ["Rust", "C++"]}]}
        })
    }

    #[test]
    fn test_fixed_mode_fills_placeholders() {
        let out = compose(&doc(resume()), &template()).unwrap();

        assert!(out.contains("\\textbf{\\Huge \\scshape Jake Ryan}"));
        assert!(out.contains("\\href{mailto:jake@su.edu}{\\underline{jake@su.edu}}"));
        assert!(out.contains("    \\resumeSubheading\n      {Southwestern University}{Georgetown, TX}\n"));
        assert!(out.contains("     \\textbf{Languages}{: Rust, C++} \\\\"));
        assert!(!out.contains("{{"));
        assert!(!out.contains("\\section{Certifications}"));
    }

    #[test]
    fn test_fixed_mode_optional_sections_carry_headers() {
        let mut value = resume();
        value["certifications"] = json!([{"name": "CKA", "issuer": "CNCF", "date": "2023"}]);
        let out = compose(&doc(value), &template()).unwrap();

        assert!(out.contains("\\section{Certifications}\n \\begin{itemize}"));
        assert!(out.contains("\\textbf{CKA} - CNCF (2023)"));
    }

    #[test]
    fn test_dynamic_mode_respects_order() {
        let mut value = resume();
        value["section_order"] = json!(["skills", "education"]);
        let out = compose(&doc(value.clone()), &template()).unwrap();

        let skills = out.find("\\section{Skills}").unwrap();
        let education = out.find("\\section{Education}").unwrap();
        assert!(skills < education);
        assert!(!out.contains("\\section{Projects}"));
        assert!(!out.contains("SECTION}}"));

        value["section_order"] = json!(["skills", "ghost", "education"]);
        assert_eq!(compose(&doc(value), &template()).unwrap(), out);
    }

    #[test]
    fn test_dynamic_mode_with_single_section() {
        let mut value = resume();
        value["section_order"] = json!(["education"]);
        let out = compose(&doc(value), &template()).unwrap();

        assert!(out.contains("\\section{Education}"));
        assert!(!out.contains("\\section{Technical Skills}"));
        assert!(out.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn test_heading_is_never_a_section() {
        let mut value = resume();
        value["section_order"] = json!(["heading", "education"]);
        let out = compose(&doc(value), &template()).unwrap();

        assert!(!out.contains("\\section{Heading}"));
        assert!(out.find("Jake Ryan").unwrap() < out.find("\\section{Education}").unwrap());
    }

    #[test]
    fn test_dynamic_mode_needs_a_region() {
        let template = TemplateDefinition::parse("{{FULL_NAME}}\n\\end{document}", "latex").unwrap();
        let mut value = resume();
        value["section_order"] = json!(["education"]);
        assert!(matches!(
            compose(&doc(value), &template),
            Err(TemplateError::MissingSectionRegion { .. })
        ));
    }

    #[test]
    fn test_end_to_end_projects_scenario() {
        let value = json!({
            "heading": {"full_name": "Jake Ryan", "email": "jake@su.edu"},
            "projects": [{
                "name": "Gitlytics",
                "technologies": ["Python"],
                "date": "2020",
                "url": "",
                "description": ["Did X"]
            }],
            "section_order": ["projects"]
        });
        let out = compose(&doc(value), &template()).unwrap();

        let heading = out.find("Jake Ryan").unwrap();
        let project = out.find("\\textbf{Gitlytics} $|$ \\emph{Python}").unwrap();
        assert!(heading < project);
        assert!(out.contains("jake@su.edu"));
        assert!(out.contains("\\resumeItem{Did X}"));

        let body = &out[project..];
        assert!(!body.contains(" & "));
        assert!(!body.replace("\\_", "").contains('_'));
    }
}
