use std::thread;

use crate::pipeline::compare_transcripts_use_case::{Panel, PanelScorer, ScoredPanel};
use crate::pipeline::comparison_executor::ComparisonExecutor;
use crate::shared::constants::DEFAULT_WORKER_THREADS;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// Scores panels on a fixed pool of scoped worker threads.
///
/// Layout: `feeder → [worker × N] → main [reorder]`
///
/// Panels are independent, so each worker takes the next queued panel and
/// sends back `(index, result)`; the main thread puts results back in input
/// order.
pub struct ThreadedComparisonExecutor {
    workers: usize,
    channel_capacity: usize,
}

impl ThreadedComparisonExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for ThreadedComparisonExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_WORKER_THREADS)
    }
}

impl ComparisonExecutor for ThreadedComparisonExecutor {
    fn execute(
        &self,
        scorer: &PanelScorer,
        panels: &[Panel],
    ) -> Result<Vec<ScoredPanel>, Box<dyn std::error::Error>> {
        if panels.is_empty() {
            return Ok(Vec::new());
        }
        let workers = self.workers.min(panels.len());
        log::debug!("Scoring {} panels on {workers} threads", panels.len());

        let (job_tx, job_rx) = crossbeam_channel::bounded::<(usize, &Panel)>(self.channel_capacity);
        let (result_tx, result_rx) =
            crossbeam_channel::bounded::<(usize, ScoredPanel)>(self.channel_capacity);

        let mut slots: Vec<Option<ScoredPanel>> = (0..panels.len()).map(|_| None).collect();
        let mut panicked = 0usize;

        thread::scope(|scope| {
            let feeder = scope.spawn(move || {
                for job in panels.iter().enumerate() {
                    if job_tx.send(job).is_err() {
                        break;
                    }
                }
            });

            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let job_rx = job_rx.clone();
                    let result_tx = result_tx.clone();
                    scope.spawn(move || {
                        for (idx, panel) in job_rx {
                            if result_tx.send((idx, scorer.score(panel))).is_err() {
                                break;
                            }
                        }
                    })
                })
                .collect();
            // Only workers hold senders now, so the loop below ends once
            // they have all finished.
            drop(result_tx);
            drop(job_rx);

            for (idx, scored) in result_rx {
                slots[idx] = Some(scored);
            }

            for handle in handles.into_iter().chain(std::iter::once(feeder)) {
                if handle.join().is_err() {
                    panicked += 1;
                }
            }
        });

        if panicked > 0 {
            return Err(format!("{panicked} comparison worker thread(s) panicked").into());
        }
        slots
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| {
                slot.ok_or_else(|| -> Box<dyn std::error::Error> {
                    format!("No result for panel {idx}").into()
                })
            })
            .collect()
    }
}
