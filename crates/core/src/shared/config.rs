use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::constants::DEFAULT_TAIL_SECONDS;
use super::tokenizer::Granularity;

/// What to do with a `speaker: text` line that carries no `[timestamp]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTimestampPolicy {
    /// The line contributes no segment boundary.
    #[default]
    Skip,
    /// The line starts a segment at 0 seconds.
    StartAtZero,
}

impl fmt::Display for MissingTimestampPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingTimestampPolicy::Skip => write!(f, "skip"),
            MissingTimestampPolicy::StartAtZero => write!(f, "zero"),
        }
    }
}

impl FromStr for MissingTimestampPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(MissingTimestampPolicy::Skip),
            "zero" | "start_at_zero" => Ok(MissingTimestampPolicy::StartAtZero),
            other => Err(format!(
                "Missing-timestamp policy must be 'skip' or 'zero', got '{other}'"
            )),
        }
    }
}

/// Parameters for turning tagged transcript lines into speaker segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiarizationConfig {
    /// Length of the synthetic tail appended to the last segment.
    pub tail_seconds: f64,
    pub missing_timestamp: MissingTimestampPolicy,
}

impl Default for DiarizationConfig {
    fn default() -> Self {
        Self {
            tail_seconds: DEFAULT_TAIL_SECONDS,
            missing_timestamp: MissingTimestampPolicy::Skip,
        }
    }
}

impl DiarizationConfig {
    /// Tail length actually applied; negative or NaN values read from a
    /// settings file count as zero.
    pub fn tail(&self) -> f64 {
        self.tail_seconds.max(0.0)
    }

    pub fn with_tail_seconds(mut self, tail_seconds: f64) -> Self {
        self.tail_seconds = tail_seconds.max(0.0);
        self
    }

    pub fn with_missing_timestamp(mut self, policy: MissingTimestampPolicy) -> Self {
        self.missing_timestamp = policy;
        self
    }
}

/// Options for one comparison run across all hypothesis panels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Apply the word map and case/punctuation folding before diffing,
    /// WER scoring and suggestion mining. DER always uses raw text.
    pub normalized: bool,
    pub granularity: Granularity,
    pub diarization: DiarizationConfig,
}
