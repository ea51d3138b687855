use serde::Serialize;

use crate::shared::rate::serialize_rate;
use crate::shared::tokenizer::words;

/// Word error rate with its operation breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WerMetrics {
    /// `(subs + ins + dels) / reference_words`; `+inf` when the reference is
    /// empty and the hypothesis is not.
    #[serde(serialize_with = "serialize_rate")]
    pub wer: f64,
    pub subs: usize,
    pub ins: usize,
    pub dels: usize,
    pub reference_words: usize,
}

impl WerMetrics {
    pub fn errors(&self) -> usize {
        self.subs + self.ins + self.dels
    }
}

/// Label of the step chosen for one table cell.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Step {
    Match,
    Substitute,
    Insert,
    Delete,
}

/// Levenshtein WER over whitespace-separated words.
///
/// When several predecessors give the same minimal cost the cell prefers
/// substitution/match, then insertion, then deletion. That order decides
/// which of several equally short alignments gets counted.
pub fn calculate_wer(reference: &str, hypothesis: &str) -> WerMetrics {
    let ref_words = words(reference);
    let hyp_words = words(hypothesis);
    let n = ref_words.len();
    let m = hyp_words.len();

    if n == 0 {
        return WerMetrics {
            wer: if m > 0 { f64::INFINITY } else { 0.0 },
            subs: 0,
            ins: m,
            dels: 0,
            reference_words: 0,
        };
    }

    let width = m + 1;
    let mut cost = vec![0usize; (n + 1) * width];
    let mut steps = vec![Step::Match; (n + 1) * width];

    for j in 0..=m {
        cost[j] = j;
        steps[j] = Step::Insert;
    }
    for i in 1..=n {
        cost[i * width] = i;
        steps[i * width] = Step::Delete;
    }

    for i in 1..=n {
        for j in 1..=m {
            let differs = ref_words[i - 1] != hyp_words[j - 1];
            let sub_cost = cost[(i - 1) * width + j - 1] + usize::from(differs);
            let ins_cost = cost[i * width + j - 1] + 1;
            let del_cost = cost[(i - 1) * width + j] + 1;

            let cell = i * width + j;
            if sub_cost <= ins_cost && sub_cost <= del_cost {
                cost[cell] = sub_cost;
                steps[cell] = if differs { Step::Substitute } else { Step::Match };
            } else if ins_cost < del_cost {
                cost[cell] = ins_cost;
                steps[cell] = Step::Insert;
            } else {
                cost[cell] = del_cost;
                steps[cell] = Step::Delete;
            }
        }
    }

    let (mut subs, mut ins, mut dels) = (0, 0, 0);
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        match steps[i * width + j] {
            Step::Substitute => {
                subs += 1;
                i -= 1;
                j -= 1;
            }
            Step::Insert => {
                ins += 1;
                j -= 1;
            }
            Step::Delete => {
                dels += 1;
                i -= 1;
            }
            Step::Match => {
                i -= 1;
                j -= 1;
            }
        }
    }

    let metrics = WerMetrics {
        wer: (subs + ins + dels) as f64 / n as f64,
        subs,
        ins,
        dels,
        reference_words: n,
    };
    log::debug!(
        "WER {:.4} over {n} reference words (S={subs} I={ins} D={dels})",
        metrics.wer
    );
    metrics
}
