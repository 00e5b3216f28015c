//! Base-template fixups applied before parsing. Each fixup is idempotent, and
//! only ever touches the template text, never user data.

/// One textual repair.
#[derive(Debug, Clone, Copy)]
enum Fixup {
    /// Prefix `% ` to every line whose trimmed text starts with this.
    CommentOutLine(&'static str),
    /// Remove every line whose trimmed text equals this.
    DropLine(&'static str),
    Replace {
        from: &'static str,
        to: &'static str,
    },
    /// Insert `line` after the first `anchor`, unless `line` already exists.
    InsertAfter {
        anchor: &'static str,
        line: &'static str,
    },
}

const FIXUPS: &[Fixup] = &[
    // Not shipped by the online compilers.
    Fixup::CommentOutLine(r"\input{glyphtounicode}"),
    // Single column keeps ATS parsers happy.
    Fixup::CommentOutLine(r"\usepackage{multicol}"),
    Fixup::DropLine(r"\setlength{\multicolsep}{-3.0pt}"),
    Fixup::DropLine(r"\setlength{\columnsep}{-1pt}"),
    Fixup::Replace {
        from: concat!(
            "%-----------PROJECTS-----------\n",
            r"\section{Projects}",
            "\n",
            r"    \vspace{-5pt}"
        ),
        to: concat!("%-----------PROJECTS-----------\n", r"\section{Projects}"),
    },
    Fixup::Replace {
        from: r"\vspace{-15pt}",
        to: r"\vspace{-16pt}",
    },
    Fixup::InsertAfter {
        anchor: r"\raggedbottom",
        line: r"\raggedright",
    },
    // \resumeSubheading body split across lines.
    Fixup::Replace {
        from: concat!(
            r"\begin{tabular*}{1.0\textwidth}[t]{l@{\extracolsep{\fill}}r}",
            "\n",
            r"      \textbf{#1} & \textbf{\small #2} \\",
            "\n",
            r"      \textit{\small#3} & \textit{\small #4} \\",
            "\n",
            r"    \end{tabular*}"
        ),
        to: concat!(
            r"\begin{tabular*}{1.0\textwidth}[t]{l@{\extracolsep{\fill}}r}",
            r"\textbf{#1} & \textbf{\small #2} \\",
            r"\textit{\small#3} & \textit{\small #4} \\ \end{tabular*}"
        ),
    },
    // \resumeProjectHeading body split across lines.
    Fixup::Replace {
        from: concat!(
            r"\begin{tabular*}{1.001\textwidth}{l@{\extracolsep{\fill}}r}",
            "\n",
            r"      \small#1 & \textbf{\small #2}\\",
            "\n",
            r"    \end{tabular*}"
        ),
        to: concat!(
            r"\begin{tabular*}{1.001\textwidth}{l@{\extracolsep{\fill}}r}",
            r"\small#1 & \textbf{\small #2}\\ \end{tabular*}"
        ),
    },
];

/// Applies every fixup in order.
pub fn preprocess(template: &str) -> String {
    FIXUPS
        .iter()
        .fold(template.to_string(), |text, fixup| apply(fixup, text))
}

fn apply(fixup: &Fixup, text: String) -> String {
    match *fixup {
        Fixup::CommentOutLine(prefix) => map_lines(&text, |line| {
            if line.trim_start().starts_with(prefix) {
                Some(format!("% {line}"))
            } else {
                Some(line.to_string())
            }
        }),
        Fixup::DropLine(exact) => map_lines(&text, |line| {
            (line.trim() != exact).then(|| line.to_string())
        }),
        Fixup::Replace { from, to } => text.replace(from, to),
        Fixup::InsertAfter { anchor, line } => {
            if text.contains(line) {
                text
            } else {
                text.replacen(anchor, &format!("{anchor}\n{line}"), 1)
            }
        }
    }
}

/// Rewrites the text line by line; `None` drops the line.
fn map_lines(text: &str, f: impl Fn(&str) -> Option<String>) -> String {
    text.split('\n').filter_map(f).collect::<Vec<_>>().join("\n")
}
