use std::collections::HashMap;
use std::hash::Hash;

use super::edit_script::{Alignment, EditKind};

/// Table sizes above this many cells get a warning; the table is still built.
const LARGE_TABLE_CELLS: usize = 50_000_000;

/// Longest-common-subsequence aligner producing a merged edit script.
///
/// Backtracking starts at the bottom-right cell and prefers, in order:
/// `Equal` when the tokens match, then `Insert` when taking one hypothesis
/// token keeps an LCS at least as long as taking one reference token, then
/// `Delete`. Ties therefore favor `Insert`, which places a substitution as
/// `Delete` followed by `Insert` in the final script.
pub struct SequenceAligner;

impl SequenceAligner {
    pub fn new() -> Self {
        Self
    }

    pub fn align<T: Eq + Hash + Clone>(&self, reference: &[T], hypothesis: &[T]) -> Alignment<T> {
        // A shared suffix is always consumed by `Equal` steps first, so it can
        // be emitted directly without growing the table.
        let suffix = common_suffix_len(reference, hypothesis);
        let ref_body = &reference[..reference.len() - suffix];
        let hyp_body = &hypothesis[..hypothesis.len() - suffix];

        let (ref_ids, hyp_ids) = intern(ref_body, hyp_body);
        let steps = backtrack(&ref_ids, &hyp_ids);

        let mut alignment = Alignment::new();
        let (mut i, mut j) = (0usize, 0usize);
        for kind in steps {
            match kind {
                EditKind::Equal => {
                    alignment.push(kind, ref_body[i].clone());
                    i += 1;
                    j += 1;
                }
                EditKind::Insert => {
                    alignment.push(kind, hyp_body[j].clone());
                    j += 1;
                }
                EditKind::Delete => {
                    alignment.push(kind, ref_body[i].clone());
                    i += 1;
                }
            }
        }
        alignment.push_run(
            EditKind::Equal,
            reference[reference.len() - suffix..].iter().cloned(),
        );
        alignment
    }
}

impl Default for SequenceAligner {
    fn default() -> Self {
        Self::new()
    }
}

fn common_suffix_len<T: Eq>(a: &[T], b: &[T]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Maps tokens to dense ids so the table compares integers, not strings.
fn intern<'a, T: Eq + Hash>(reference: &'a [T], hypothesis: &'a [T]) -> (Vec<u32>, Vec<u32>) {
    let mut ids: HashMap<&'a T, u32> = HashMap::new();
    let mut id_of = |token: &'a T| {
        let next = ids.len() as u32;
        *ids.entry(token).or_insert(next)
    };
    let ref_ids = reference.iter().map(&mut id_of).collect();
    let hyp_ids = hypothesis.iter().map(&mut id_of).collect();
    (ref_ids, hyp_ids)
}

/// Fills the LCS table and walks it back, returning steps in forward order.
fn backtrack(a: &[u32], b: &[u32]) -> Vec<EditKind> {
    let n = a.len();
    let m = b.len();
    let width = m + 1;
    let cells = (n + 1) * width;
    if cells > LARGE_TABLE_CELLS {
        log::warn!("Aligning {n}x{m} tokens needs a {cells}-cell table");
    } else {
        log::debug!("Aligning {n}x{m} tokens");
    }

    let mut lcs = vec![0u32; cells];
    for i in 1..=n {
        for j in 1..=m {
            lcs[i * width + j] = if a[i - 1] == b[j - 1] {
                lcs[(i - 1) * width + j - 1] + 1
            } else {
                lcs[(i - 1) * width + j].max(lcs[i * width + j - 1])
            };
        }
    }

    let mut steps = Vec::with_capacity(n + m);
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && a[i - 1] == b[j - 1] {
            steps.push(EditKind::Equal);
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || lcs[i * width + j - 1] >= lcs[(i - 1) * width + j]) {
            steps.push(EditKind::Insert);
            j -= 1;
        } else {
            steps.push(EditKind::Delete);
            i -= 1;
        }
    }
    steps.reverse();
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::domain::edit_script::EditOp;
    use crate::shared::tokenizer::{chars, words, words_with_separators};
    use rstest::rstest;

    fn align<'a>(reference: &[&'a str], hypothesis: &[&'a str]) -> Alignment<&'a str> {
        SequenceAligner::new().align(reference, hypothesis)
    }

    fn op<'a>(kind: EditKind, run: &[&'a str]) -> EditOp<&'a str> {
        EditOp {
            kind,
            run: run.to_vec(),
        }
    }

    #[test]
    fn test_identical_sequences_yield_single_equal_run() {
        let tokens = words("the quick brown fox");
        let alignment = align(&tokens, &tokens);
        assert_eq!(alignment.ops(), &[op(EditKind::Equal, &tokens)]);
    }

    #[test]
    fn test_both_empty() {
        assert!(align(&[], &[]).is_empty());
    }

    #[test]
    fn test_empty_reference_is_all_insert() {
        let alignment = align(&[], &["a", "b"]);
        assert_eq!(alignment.ops(), &[op(EditKind::Insert, &["a", "b"])]);
    }

    #[test]
    fn test_empty_hypothesis_is_all_delete() {
        let alignment = align(&["a", "b"], &[]);
        assert_eq!(alignment.ops(), &[op(EditKind::Delete, &["a", "b"])]);
    }

    #[test]
    fn test_substitution_is_delete_then_insert() {
        let alignment = align(&["quick", "brown", "fox"], &["quick", "brown", "wolf"]);
        assert_eq!(
            alignment.ops(),
            &[
                op(EditKind::Equal, &["quick", "brown"]),
                op(EditKind::Delete, &["fox"]),
                op(EditKind::Insert, &["wolf"]),
            ]
        );
    }

    #[test]
    fn test_tie_places_insert_before_shared_token() {
        // Two equal-length scripts exist; the backtrack keeps the matching
        // token at the end and reports the extra one as leading insertion.
        let alignment = align(&["a"], &["a", "a"]);
        assert_eq!(
            alignment.ops(),
            &[op(EditKind::Insert, &["a"]), op(EditKind::Equal, &["a"])]
        );
    }

    #[test]
    fn test_inner_insertion_and_deletion() {
        let alignment = align(&["a", "b", "c", "d"], &["a", "x", "c", "d", "e"]);
        assert_eq!(
            alignment.ops(),
            &[
                op(EditKind::Equal, &["a"]),
                op(EditKind::Delete, &["b"]),
                op(EditKind::Insert, &["x"]),
                op(EditKind::Equal, &["c", "d"]),
                op(EditKind::Insert, &["e"]),
            ]
        );
    }

    #[test]
    fn test_no_adjacent_ops_share_kind() {
        let reference = chars("kitten sitting on the mat");
        let hypothesis = chars("sitting kitten at the mall");
        let alignment = align(&reference, &hypothesis);
        for pair in alignment.ops().windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
        }
    }

    #[rstest]
    #[case("the cat sat on the mat", "a cat sits on a mat today")]
    #[case("", "all new words")]
    #[case("all old words", "")]
    #[case("repeat repeat repeat", "repeat x repeat")]
    #[case("Hello,  world!\nLine two", "Hello world\nline  two!")]
    fn test_round_trip_reconstructs_inputs(#[case] reference: &str, #[case] hypothesis: &str) {
        let ref_tokens = words_with_separators(reference);
        let hyp_tokens = words_with_separators(hypothesis);
        let alignment = align(&ref_tokens, &hyp_tokens);

        let rebuilt_ref: String = alignment.reference_tokens().into_iter().copied().collect();
        let rebuilt_hyp: String = alignment.hypothesis_tokens().into_iter().copied().collect();
        assert_eq!(rebuilt_ref, reference);
        assert_eq!(rebuilt_hyp, hypothesis);
    }

    #[test]
    fn test_suffix_peeling_matches_full_table() {
        // Same inputs without the shared tail must produce the same head.
        let with_tail = align(&["x", "a", "b", "z", "z"], &["a", "y", "b", "z", "z"]);
        let without_tail = align(&["x", "a", "b"], &["a", "y", "b"]);
        let head: Vec<_> = with_tail.ops()[..with_tail.ops().len() - 1].to_vec();
        assert_eq!(&head[..], &without_tail.ops()[..without_tail.ops().len() - 1]);
        assert_eq!(with_tail.ops().last().unwrap().run, vec!["b", "z", "z"]);
    }

    #[test]
    fn test_works_on_owned_strings() {
        let reference = vec!["one".to_string(), "two".to_string()];
        let hypothesis = vec!["two".to_string()];
        let alignment = SequenceAligner::new().align(&reference, &hypothesis);
        assert_eq!(alignment.ops()[0].kind, EditKind::Delete);
        assert_eq!(alignment.ops()[1].run, vec!["two".to_string()]);
    }
}
