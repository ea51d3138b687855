use super::suggestion::{dedupe_suggestions, Suggestion};
use crate::alignment::domain::edit_script::EditKind;
use crate::alignment::domain::sequence_aligner::SequenceAligner;
use crate::normalization::domain::equivalence_map::EquivalenceMap;
use crate::normalization::domain::text_normalizer::fold_content;
use crate::normalization::domain::word_mapper::WordMapper;
use crate::shared::tokenizer::{tokenize, Granularity};
use crate::transcript::domain::speaker_line::strip_speaker_tags;

/// One-word substitutions between two texts.
///
/// Texts are aligned at word granularity with whitespace kept as tokens, so
/// neighbouring replaced words stay separate runs. A single deleted reference
/// word directly followed by a single inserted hypothesis word yields
/// `{ source: inserted, target: deleted }`. Longer replaced runs are ignored.
pub fn extract_substitutions(reference: &str, hypothesis: &str) -> Vec<Suggestion> {
    let ref_tokens = tokenize(reference, Granularity::Word);
    let hyp_tokens = tokenize(hypothesis, Granularity::Word);
    let alignment = SequenceAligner::new().align(&ref_tokens, &hyp_tokens);
    let ops = alignment.ops();

    let mut suggestions = Vec::new();
    let mut idx = 0;
    while idx < ops.len() {
        if let [deleted, inserted, ..] = &ops[idx..] {
            if deleted.kind == EditKind::Delete
                && inserted.kind == EditKind::Insert
                && deleted.len() == 1
                && inserted.len() == 1
                && is_word(deleted.run[0])
                && is_word(inserted.run[0])
            {
                suggestions.push(Suggestion::new(inserted.run[0], deleted.run[0]));
                idx += 2;
                continue;
            }
        }
        idx += 1;
    }
    suggestions
}

fn is_word(token: &str) -> bool {
    !token.trim().is_empty()
}

/// Collects new equivalence candidates from several hypotheses.
pub struct SuggestionMiner<'a> {
    map: &'a EquivalenceMap,
    mapper: WordMapper,
}

impl<'a> SuggestionMiner<'a> {
    pub fn new(map: &'a EquivalenceMap) -> Self {
        let mapper = WordMapper::new(map).unwrap_or_else(|e| {
            log::warn!("Word map could not be compiled, mining without it: {e}");
            WordMapper::identity()
        });
        Self { map, mapper }
    }

    /// Reuses an already compiled mapper for `map`.
    pub fn with_mapper(map: &'a EquivalenceMap, mapper: WordMapper) -> Self {
        Self { map, mapper }
    }

    /// Strips speaker tags, normalizes with the map, extracts one-word
    /// substitutions per hypothesis and keeps those that are neither repeated
    /// nor already mapped.
    pub fn mine(&self, reference: &str, hypotheses: &[&str]) -> Vec<Suggestion> {
        let reference = self.prepare(reference);
        let found: Vec<Suggestion> = hypotheses
            .iter()
            .flat_map(|hypothesis| extract_substitutions(&reference, &self.prepare(hypothesis)))
            .collect();
        let total = found.len();

        let fresh: Vec<Suggestion> = dedupe_suggestions(found)
            .into_iter()
            .filter(|s| !self.map.contains_mapping(&s.source, &s.target))
            .collect();
        log::debug!(
            "Mined {} new suggestions from {total} substitutions across {} hypotheses",
            fresh.len(),
            hypotheses.len()
        );
        fresh
    }

    fn prepare(&self, text: &str) -> String {
        fold_content(&self.mapper.apply(&strip_speaker_tags(text)))
    }
}
