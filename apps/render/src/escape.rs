//! Text Escaper: makes arbitrary user text safe to embed literally in LaTeX.
//!
//! Every textual leaf of a resume passes through [`escape_latex`] exactly once.
//! Structural punctuation emitted by the renderers (braces, macros) never does.

/// Formatting commands that mark a string as intentional markup. When one of
/// these is present, backslashes are kept as-is.
const ALLOWED_COMMANDS: &[&str] = &["\\textbf", "\\href", "\\emph", "\\textit"];

/// Escapes the nine LaTeX special characters in `text`.
///
/// Replacements: `\` → `\textbackslash{}` (unless the text already uses an
/// allowed formatting command), `& % $ # _ { }` → backslash-prefixed, `~` →
/// `\textasciitilde{}`, `^` → `\^{}`.
///
/// Runs as a single pass over the input, so the braces introduced by a
/// replacement are never themselves escaped.
pub fn escape_latex(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let keep_backslash = text.contains('\\')
        && ALLOWED_COMMANDS.iter().any(|cmd| text.contains(cmd));

    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        match ch {
            '\\' if keep_backslash => out.push('\\'),
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\^{}"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_is_unchanged_and_idempotent() {
        let once = escape_latex("hello world");
        assert_eq!(once, "hello world");
        assert_eq!(escape_latex(&once), once);
    }

    #[test]
    fn test_empty_escapes_to_empty() {
        assert_eq!(escape_latex(""), "");
    }

    #[test]
    fn test_every_special_character_is_replaced() {
        let cases = [
            ("&", "\\&"),
            ("%", "\\%"),
            ("$", "\\$"),
            ("#", "\\#"),
            ("_", "\\_"),
            ("{", "\\{"),
            ("}", "\\}"),
            ("~", "\\textasciitilde{}"),
            ("^", "\\^{}"),
            ("\\", "\\textbackslash{}"),
        ];
        for (input, expected) in cases {
            assert_eq!(escape_latex(input), expected, "escaping {input:?}");
        }
    }

    #[test]
    fn test_backslash_replacement_braces_are_not_double_escaped() {
        assert_eq!(escape_latex("C:\\dir"), "C:\\textbackslash{}dir");
    }

    #[test]
    fn test_allowed_command_keeps_backslash() {
        let escaped = escape_latex("\\textbf{Bold} & more");
        assert!(escaped.starts_with("\\textbf"));
        assert!(!escaped.contains("textbackslash"));
        assert!(escaped.contains("\\&"));
    }

    #[test]
    fn test_mixed_sentence() {
        assert_eq!(
            escape_latex("Cut costs 40% & saved $5k for R_D #1"),
            "Cut costs 40\\% \\& saved \\$5k for R\\_D \\#1"
        );
    }
}
