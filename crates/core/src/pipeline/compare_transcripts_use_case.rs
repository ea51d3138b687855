use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::alignment::domain::diff_renderer::{compute_diff_markup, DiffRenderer};
use crate::normalization::domain::equivalence_map::EquivalenceMap;
use crate::normalization::domain::text_normalizer::TextNormalizer;
use crate::normalization::domain::word_mapper::WordMapper;
use crate::pipeline::comparison_executor::ComparisonExecutor;
use crate::pipeline::comparison_logger::ComparisonLogger;
use crate::scoring::domain::der::{calculate_der, DerMetrics};
use crate::scoring::domain::wer::{calculate_wer, WerMetrics};
use crate::shared::config::ComparisonConfig;
use crate::shared::rate::format_percent;
use crate::suggestions::domain::suggestion::Suggestion;
use crate::suggestions::domain::suggestion_miner::SuggestionMiner;
use crate::transcript::domain::speaker_line::strip_speaker_tags;

/// A titled transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    pub text: String,
}

impl Panel {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Everything computed for one hypothesis panel.
#[derive(Debug, Clone, Serialize)]
pub struct PanelReport {
    pub title: String,
    pub diff_markup: String,
    pub wer: WerMetrics,
    pub der: DerMetrics,
    pub suggestions: Vec<Suggestion>,
}

/// A report plus how long each stage took (milliseconds).
#[derive(Debug, Clone)]
pub struct ScoredPanel {
    pub report: PanelReport,
    pub timings: Vec<(&'static str, f64)>,
}

/// Reference-side state shared by every panel of one run.
///
/// Built once per run; `score` only reads it, so one scorer can serve
/// several worker threads.
pub struct PanelScorer<'a> {
    reference: &'a str,
    reference_display: String,
    reference_content: String,
    config: &'a ComparisonConfig,
    normalizer: Option<TextNormalizer>,
    renderer: &'a dyn DiffRenderer,
    miner: SuggestionMiner<'a>,
}

impl<'a> PanelScorer<'a> {
    pub fn new(
        reference: &'a str,
        config: &'a ComparisonConfig,
        map: &'a EquivalenceMap,
        renderer: &'a dyn DiffRenderer,
    ) -> Self {
        let mapper = WordMapper::new(map).unwrap_or_else(|e| {
            log::warn!("Word map could not be compiled, comparing without it: {e}");
            WordMapper::identity()
        });
        let miner = SuggestionMiner::with_mapper(map, mapper.clone());
        let normalizer = config.normalized.then(|| TextNormalizer::new(mapper));

        let mut scorer = Self {
            reference,
            reference_display: String::new(),
            reference_content: String::new(),
            config,
            normalizer,
            renderer,
            miner,
        };
        scorer.reference_display = scorer.display_text(reference);
        scorer.reference_content = scorer.content_text(reference);
        scorer
    }

    pub fn score(&self, panel: &Panel) -> ScoredPanel {
        let mut timings = Vec::with_capacity(4);

        let diff_markup = timed("diff", &mut timings, || {
            compute_diff_markup(
                &self.reference_display,
                &self.display_text(&panel.text),
                self.config.granularity,
                self.renderer,
            )
        });
        let wer = timed("wer", &mut timings, || {
            calculate_wer(&self.reference_content, &self.content_text(&panel.text))
        });
        // Speaker timing is always read from the untouched text.
        let der = timed("der", &mut timings, || {
            calculate_der(self.reference, &panel.text, &self.config.diarization)
        });
        let suggestions = timed("suggest", &mut timings, || {
            self.miner.mine(self.reference, &[panel.text.as_str()])
        });

        ScoredPanel {
            report: PanelReport {
                title: panel.title.clone(),
                diff_markup,
                wer,
                der,
                suggestions,
            },
            timings,
        }
    }

    /// Text shown in the diff: tags kept, normalized when enabled.
    fn display_text(&self, text: &str) -> String {
        match &self.normalizer {
            Some(normalizer) => normalizer.normalize(text),
            None => text.to_string(),
        }
    }

    /// Text scored for WER: tags stripped, normalized when enabled.
    fn content_text(&self, text: &str) -> String {
        let content = strip_speaker_tags(text);
        match &self.normalizer {
            Some(normalizer) => normalizer.normalize(&content),
            None => content,
        }
    }
}

fn timed<T>(
    stage: &'static str,
    timings: &mut Vec<(&'static str, f64)>,
    f: impl FnOnce() -> T,
) -> T {
    let start = Instant::now();
    let value = f();
    timings.push((stage, start.elapsed().as_secs_f64() * 1000.0));
    value
}

/// Scores every hypothesis panel against a reference panel: diff markup,
/// WER, DER and substitution suggestions.
pub struct CompareTranscriptsUseCase {
    config: ComparisonConfig,
    map: EquivalenceMap,
    renderer: Box<dyn DiffRenderer>,
    executor: Box<dyn ComparisonExecutor>,
    logger: Box<dyn ComparisonLogger>,
}

impl CompareTranscriptsUseCase {
    pub fn new(
        config: ComparisonConfig,
        map: EquivalenceMap,
        renderer: Box<dyn DiffRenderer>,
        executor: Box<dyn ComparisonExecutor>,
        logger: Box<dyn ComparisonLogger>,
    ) -> Self {
        Self {
            config,
            map,
            renderer,
            executor,
            logger,
        }
    }

    /// The first panel is the reference; one report is returned for each
    /// remaining panel, in order.
    pub fn execute(
        &mut self,
        panels: &[Panel],
    ) -> Result<Vec<PanelReport>, Box<dyn std::error::Error>> {
        let (reference, hypotheses) = panels
            .split_first()
            .ok_or("No reference panel to compare against")?;

        let scorer = PanelScorer::new(&reference.text, &self.config, &self.map, &*self.renderer);
        let scored = self.executor.execute(&scorer, hypotheses)?;
        if scored.len() != hypotheses.len() {
            return Err(format!(
                "Executor returned {} results for {} panels",
                scored.len(),
                hypotheses.len()
            )
            .into());
        }

        let total = scored.len();
        let mut reports = Vec::with_capacity(total);
        for (idx, ScoredPanel { report, timings }) in scored.into_iter().enumerate() {
            for (stage, ms) in timings {
                self.logger.timing(stage, ms);
            }
            self.logger.metric("wer", report.wer.wer);
            self.logger.metric("der", report.der.der);
            self.logger.info(&format!(
                "{} vs {}: WER {}, DER {}, {} suggestions",
                report.title,
                reference.title,
                format_percent(report.wer.wer),
                format_percent(report.der.der),
                report.suggestions.len()
            ));
            self.logger.progress(idx + 1, total);
            reports.push(report);
        }
        self.logger.summary();

        Ok(reports)
    }
}
