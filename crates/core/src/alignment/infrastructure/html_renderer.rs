use crate::alignment::domain::diff_renderer::DiffRenderer;
use crate::alignment::domain::edit_script::EditKind;

pub const DELETE_CLASS: &str = "diff-delete";
pub const INSERT_CLASS: &str = "diff-insert";

/// Renders runs as HTML, wrapping deletions in `<del>` and insertions in
/// `<ins>`. All text is escaped, so transcripts containing markup are shown
/// literally.
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffRenderer for HtmlRenderer {
    fn render_run(&self, kind: EditKind, text: &str, out: &mut String) {
        match kind {
            EditKind::Equal => escape_into(text, out),
            EditKind::Delete => {
                out.push_str(&format!("<del class=\"{DELETE_CLASS}\">"));
                escape_into(text, out);
                out.push_str("</del>");
            }
            EditKind::Insert => {
                out.push_str(&format!("<ins class=\"{INSERT_CLASS}\">"));
                escape_into(text, out);
                out.push_str("</ins>");
            }
        }
    }
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
