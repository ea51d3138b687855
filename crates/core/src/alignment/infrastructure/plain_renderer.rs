use crate::alignment::domain::diff_renderer::DiffRenderer;
use crate::alignment::domain::edit_script::EditKind;

/// wdiff-style markers: `[-deleted-]` and `{+inserted+}`.
pub struct PlainRenderer;

impl PlainRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffRenderer for PlainRenderer {
    fn render_run(&self, kind: EditKind, text: &str, out: &mut String) {
        match kind {
            EditKind::Equal => out.push_str(text),
            EditKind::Delete => {
                out.push_str("[-");
                out.push_str(text);
                out.push_str("-]");
            }
            EditKind::Insert => {
                out.push_str("{+");
                out.push_str(text);
                out.push_str("+}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::domain::diff_renderer::compute_diff_markup;
    use crate::shared::tokenizer::Granularity;

    #[test]
    fn test_word_diff_markers() {
        let text = compute_diff_markup(
            "the cat sat",
            "a cat sits",
            Granularity::Word,
            &PlainRenderer::new(),
        );
        assert_eq!(text, "[-the-]{+a+} cat [-sat-]{+sits+}");
    }
}
