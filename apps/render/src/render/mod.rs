//! Structure Renderer: turns one section value into LaTeX by its shape.
//!
//! Dispatch never looks at the section name: the same value renders the same
//! way whether it is called `projects` or `side_quests`.

pub mod heading;
pub mod records;

use crate::escape::escape_latex;
use crate::models::{Category, SectionValue};

pub use heading::heading_vars;
pub use records::render_records;

/// Renders a complete dynamic-mode block: marker comment, `\section` title,
/// then the body. Returns an empty string for an empty value.
pub fn render_section(name: &str, value: &SectionValue) -> String {
    let body = render_body(value);
    if body.is_empty() {
        return String::new();
    }

    let title = section_title(name);
    let mut out = format!("\n%-----------{}-----------\n", title.to_uppercase());
    out.push_str(&format!("\\section{{{}}}\n", escape_latex(&title)));
    out.push_str(&body);
    out
}

/// Renders a section body without a title.
pub fn render_body(value: &SectionValue) -> String {
    if value.is_empty() {
        return String::new();
    }

    match value {
        SectionValue::Text(text) => format!("{}\n\\vspace{{-8pt}}\n", escape_latex(text)),
        SectionValue::StringList(items) => {
            let mut out = String::from("\\begin{itemize}[leftmargin=0.15in]\n");
            for item in items {
                out.push_str(&format!("  \\item {}\n", escape_latex(item)));
            }
            out.push_str("\\end{itemize}\n");
            out.push_str("\\vspace{-8pt}\n");
            out
        }
        SectionValue::RecordList(records) => render_records(records),
        SectionValue::Categorized(categories) => {
            let mut out = String::from(" \\begin{itemize}[leftmargin=0.15in, label={}]\n");
            out.push_str("    \\small{\\item{\n");
            for line in category_lines(categories) {
                out.push_str(&line);
                out.push('\n');
            }
            out.push_str("    }}\n");
            out.push_str(" \\end{itemize}\n");
            out.push_str("\\vspace{-16pt}\n");
            out
        }
        SectionValue::Generic(pairs) => {
            let mut out = String::from("\\begin{itemize}[leftmargin=0.15in]\n");
            for (key, value) in pairs {
                out.push_str(&format!(
                    "  \\item \\textbf{{{}}}: {}\n",
                    escape_latex(key),
                    escape_latex(value)
                ));
            }
            out.push_str("\\end{itemize}\n");
            out.push_str("\\vspace{-8pt}\n");
            out
        }
    }
}

/// `\textbf{Name}{: a, b, c} \\`, one line per category.
pub fn category_lines(categories: &[Category]) -> Vec<String> {
    categories
        .iter()
        .map(|cat| {
            let items = cat
                .items
                .iter()
                .map(|i| escape_latex(i))
                .collect::<Vec<_>>()
                .join(", ");
            format!("     \\textbf{{{}}}{{: {items}}} \\\\", escape_latex(&cat.name))
        })
        .collect()
}

/// `work_experience` → `Work Experience`.
pub fn section_title(name: &str) -> String {
    let mut title = String::with_capacity(name.len());
    let mut word_start = true;
    for ch in name.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if word_start {
                title.extend(ch.to_uppercase());
            } else {
                title.extend(ch.to_lowercase());
            }
            word_start = false;
        } else {
            title.push(ch);
            word_start = true;
        }
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use serde_json::json;

    #[test]
    fn test_section_title() {
        assert_eq!(section_title("work_experience"), "Work Experience");
        assert_eq!(section_title("SKILLS"), "Skills");
        assert_eq!(section_title("open_source_2024"), "Open Source 2024");
    }

    #[test]
    fn test_text_renders_as_paragraph() {
        let out = render_body(&SectionValue::Text("Rust & systems".to_string()));
        assert_eq!(out, "Rust \\& systems\n\\vspace{-8pt}\n");
    }

    #[test]
    fn test_string_list_renders_as_bullets() {
        let out = render_body(&SectionValue::StringList(vec![
            "Dean's List".into(),
            "100% attendance".into(),
        ]));
        assert!(out.contains("  \\item Dean's List\n"));
        assert!(out.contains("  \\item 100\\% attendance\n"));
    }

    #[test]
    fn test_categories_render_bold_names_and_escaped_items() {
        let out = render_body(&SectionValue::Categorized(vec![Category {
            name: "Languages".into(),
            items: vec!["C#".into(), "Rust".into()],
        }]));
        assert!(out.contains("     \\textbf{Languages}{: C\\#, Rust} \\\\\n"));
        assert!(out.ends_with("\\vspace{-16pt}\n"));
    }

    #[test]
    fn test_generic_object_renders_key_value_bullets() {
        let out = render_body(&SectionValue::Generic(vec![(
            "work_auth".into(),
            "US citizen".into(),
        )]));
        assert!(out.contains("  \\item \\textbf{work\\_auth}: US citizen\n"));
    }

    #[test]
    fn test_render_section_has_marker_and_title() {
        let out = render_section("volunteer_work", &SectionValue::Text("Food bank".into()));
        assert!(out.starts_with("\n%-----------VOLUNTEER WORK-----------\n\\section{Volunteer Work}\n"));
    }

    #[test]
    fn test_empty_value_renders_nothing() {
        assert_eq!(render_section("skills", &SectionValue::StringList(vec![])), "");
    }

    #[test]
    fn test_layout_depends_on_shape_not_name() {
        let value = SectionValue::RecordList(vec![Record::new(
            json!({"name": "X", "technologies": ["Rust"]})
                .as_object()
                .cloned()
                .unwrap(),
        )]);
        let a = render_section("projects", &value);
        let b = render_section("side_quests", &value);
        let body = |s: &str| s.split_once("}\n").map(|(_, rest)| rest.to_string()).unwrap();
        assert_eq!(body(&a), body(&b));
    }
}
