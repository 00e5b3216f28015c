//! Record-list layouts. The layout is picked from the first record's key set
//! (see [`RecordKind::classify`]); every record in a section is rendered with it.
//!
//! The `*_items` builders emit entries without list wrappers so fixed-mode
//! templates, which carry their own `\resumeSubHeadingListStart/End`, can reuse them.

use crate::escape::escape_latex;
use crate::models::{Record, RecordKind};

const DETAIL_KEYS: &[&str] = &["details", "responsibilities", "description"];

/// Renders a record list with the layout matching its first record.
pub fn render_records(records: &[Record]) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };

    match RecordKind::classify(first) {
        RecordKind::Entry => {
            let mut out = String::from("  \\resumeSubHeadingListStart\n");
            out.push_str(&entry_items(records));
            out.push_str("  \\resumeSubHeadingListEnd\n");
            out.push_str("\\vspace{-16pt}\n");
            out
        }
        RecordKind::Project => {
            let mut out = String::from("    \\resumeSubHeadingListStart\n");
            out.push_str(&project_items(records, true));
            out.push_str("    \\resumeSubHeadingListEnd\n");
            out
        }
        RecordKind::Certification => certification_block(records),
        RecordKind::Leadership => leadership_block(records),
        RecordKind::Generic => generic_list(records),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Education / experience
// ────────────────────────────────────────────────────────────────────────────

/// Two-line `\resumeSubheading` per record plus an optional detail list.
pub fn entry_items(records: &[Record]) -> String {
    let mut out = String::new();
    for record in records {
        let primary = escape_latex(&record.first_text(&["institution", "company"]));
        let location = escape_latex(&record.text("location"));
        let role = escape_latex(&record.first_text(&["degree", "position"]));
        let date = escape_latex(&record.text("date"));

        out.push_str("    \\resumeSubheading\n");
        out.push_str(&format!("      {{{primary}}}{{{location}}}\n"));
        out.push_str(&format!("      {{{role}}}{{{date}}}\n"));
        out.push_str(&item_list(&record.first_list(DETAIL_KEYS), "      "));
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Projects
// ────────────────────────────────────────────────────────────────────────────

/// `\resumeProjectHeading` per record. With `separated`, a `\vspace` goes
/// between consecutive projects (never after the last one).
pub fn project_items(records: &[Record], separated: bool) -> String {
    let mut out = String::new();
    for (idx, record) in records.iter().enumerate() {
        let name = escape_latex(&record.text("name"));
        let date = escape_latex(&record.text("date"));
        let url = record.text("url");
        let technologies = record
            .list("technologies")
            .iter()
            .map(|t| escape_latex(t))
            .collect::<Vec<_>>()
            .join(", ");

        let title = if !url.trim().is_empty() {
            format!("\\textbf{{\\href{{{url}}}{{{name}}}}} $|$ \\emph{{{technologies}}}")
        } else if technologies.is_empty() {
            format!("\\textbf{{{name}}}")
        } else {
            format!("\\textbf{{{name}}} $|$ \\emph{{{technologies}}}")
        };

        out.push_str("      \\resumeProjectHeading\n");
        out.push_str(&format!("          {{{title}}}{{{date}}}\n"));
        out.push_str(&item_list(&record.list("description"), "          "));

        if separated && idx + 1 < records.len() {
            out.push_str("      \\vspace{-16pt}\n");
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Certifications
// ────────────────────────────────────────────────────────────────────────────

/// One line per certification: `name - issuer (date)`, name hyperlinked when
/// a URL is present.
pub fn certification_block(records: &[Record]) -> String {
    let mut out = String::from(" \\begin{itemize}[leftmargin=0.15in, label={}]\n");
    out.push_str("    \\small{\\item{\n");
    for record in records {
        let name = escape_latex(&record.text("name"));
        let issuer = escape_latex(&record.text("issuer"));
        let date = escape_latex(&record.text("date"));
        let url = record.text("url");

        let label = if url.trim().is_empty() {
            format!("\\textbf{{{name}}}")
        } else {
            format!("\\textbf{{\\href{{{url}}}{{{name}}}}}")
        };
        out.push_str(&format!("     {label} - {issuer} ({date}) \\\\\n"));
    }
    out.push_str("    }}\n");
    out.push_str(" \\end{itemize}\n");
    out.push_str(" \\vspace{-16pt}\n");
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Leadership
// ────────────────────────────────────────────────────────────────────────────

pub fn leadership_block(records: &[Record]) -> String {
    let mut out = String::from("    \\resumeSubHeadingListStart\n");
    for record in records {
        let organization = escape_latex(&record.text("organization"));
        let role = escape_latex(&record.text("role"));
        let date = escape_latex(&record.text("date"));

        out.push_str("      \\resumeSubheading\n");
        out.push_str(&format!("        {{{organization}}}{{}}\n"));
        out.push_str(&format!("        {{{role}}}{{{date}}}\n"));
        out.push_str(&item_list(&record.list("description"), "        "));
    }
    out.push_str("    \\resumeSubHeadingListEnd\n");
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Fallback
// ────────────────────────────────────────────────────────────────────────────

/// Unrecognized records: a bold `name` lead-in followed by the other filled
/// fields, or a flat `key: value` line when there is no name.
fn generic_list(records: &[Record]) -> String {
    let mut out = String::from("\\begin{itemize}[leftmargin=0.15in]\n");
    for record in records {
        if record.has("name") {
            let mut line = format!("  \\item \\textbf{{{}}}", escape_latex(&record.text("name")));
            for (key, value) in record.filled_fields() {
                if key != "name" {
                    line.push_str(" - ");
                    line.push_str(&escape_latex(&value));
                }
            }
            out.push_str(&line);
            out.push('\n');
        } else {
            let flat = record
                .filled_fields()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("  \\item {}\n", escape_latex(&flat)));
        }
    }
    out.push_str("\\end{itemize}\n");
    out.push_str("\\vspace{-8pt}\n");
    out
}

/// `\resumeItemListStart ... \resumeItemListEnd`, or nothing for no items.
fn item_list(items: &[String], indent: &str) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut out = format!("{indent}\\resumeItemListStart\n");
    for item in items {
        out.push_str(&format!("{indent}  \\resumeItem{{{}}}\n", escape_latex(item)));
    }
    out.push_str(&format!("{indent}\\resumeItemListEnd\n"));
    out
}
