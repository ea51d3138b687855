use super::edit_script::{Alignment, EditKind};
use super::sequence_aligner::SequenceAligner;
use crate::shared::tokenizer::{tokenize, Granularity};

/// Domain interface for turning an edit script into display markup.
///
/// Implementations decide how `Insert` and `Delete` runs are marked; `Equal`
/// runs are usually written through unchanged (modulo escaping).
pub trait DiffRenderer: Send + Sync {
    fn render_run(&self, kind: EditKind, text: &str, out: &mut String);
}

/// Aligns `reference` and `hypothesis` at the given granularity and renders
/// the resulting script.
///
/// Word granularity keeps whitespace runs as their own tokens so the markup
/// reproduces both texts exactly.
pub fn compute_diff_markup(
    reference: &str,
    hypothesis: &str,
    granularity: Granularity,
    renderer: &dyn DiffRenderer,
) -> String {
    let ref_tokens = tokenize(reference, granularity);
    let hyp_tokens = tokenize(hypothesis, granularity);
    let alignment = SequenceAligner::new().align(&ref_tokens, &hyp_tokens);
    render_alignment(&alignment, renderer)
}

pub fn render_alignment(alignment: &Alignment<&str>, renderer: &dyn DiffRenderer) -> String {
    let mut out = String::new();
    for op in alignment.ops() {
        renderer.render_run(op.kind, &op.run.concat(), &mut out);
    }
    out
}
