use crate::pipeline::compare_transcripts_use_case::{Panel, PanelScorer, ScoredPanel};

/// Abstracts how hypothesis panels are scored against the reference.
///
/// This is a port. Implementations must return one result per panel, in
/// input order.
pub trait ComparisonExecutor: Send {
    fn execute(
        &self,
        scorer: &PanelScorer,
        panels: &[Panel],
    ) -> Result<Vec<ScoredPanel>, Box<dyn std::error::Error>>;
}

/// Scores panels one after another on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialComparisonExecutor;

impl ComparisonExecutor for SequentialComparisonExecutor {
    fn execute(
        &self,
        scorer: &PanelScorer,
        panels: &[Panel],
    ) -> Result<Vec<ScoredPanel>, Box<dyn std::error::Error>> {
        Ok(panels.iter().map(|panel| scorer.score(panel)).collect())
    }
}
