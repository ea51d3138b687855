use crate::alignment::domain::diff_renderer::DiffRenderer;
use crate::alignment::domain::edit_script::EditKind;

const RESET: &str = "\x1b[0m";
const DELETE_STYLE: &str = "\x1b[9;31m";
const INSERT_STYLE: &str = "\x1b[4;34m";

/// Terminal renderer: deletions struck through in red, insertions underlined
/// in blue.
///
/// Styles are closed before every newline so a run spanning several lines
/// doesn't bleed into the terminal's line prefix.
pub struct AnsiRenderer;

impl AnsiRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnsiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffRenderer for AnsiRenderer {
    fn render_run(&self, kind: EditKind, text: &str, out: &mut String) {
        let style = match kind {
            EditKind::Equal => {
                out.push_str(text);
                return;
            }
            EditKind::Delete => DELETE_STYLE,
            EditKind::Insert => INSERT_STYLE,
        };
        for (idx, line) in text.split('\n').enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            if !line.is_empty() {
                out.push_str(style);
                out.push_str(line);
                out.push_str(RESET);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_is_unstyled() {
        let mut out = String::new();
        AnsiRenderer::new().render_run(EditKind::Equal, "same", &mut out);
        assert_eq!(out, "same");
    }

    #[test]
    fn test_delete_is_wrapped() {
        let mut out = String::new();
        AnsiRenderer::new().render_run(EditKind::Delete, "gone", &mut out);
        assert_eq!(out, format!("{DELETE_STYLE}gone{RESET}"));
    }

    #[test]
    fn test_multiline_insert_resets_before_newline() {
        let mut out = String::new();
        AnsiRenderer::new().render_run(EditKind::Insert, "a\nb", &mut out);
        assert_eq!(out, format!("{INSERT_STYLE}a{RESET}\n{INSERT_STYLE}b{RESET}"));
    }
}
