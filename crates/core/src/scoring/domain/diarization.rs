use serde::Serialize;

use crate::shared::config::{DiarizationConfig, MissingTimestampPolicy};
use crate::transcript::domain::speaker_line::SpeakerLine;

/// A time interval attributed to one speaker, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiarizationSegment {
    pub start: f64,
    pub end: f64,
    pub speaker: String,
}

impl DiarizationSegment {
    pub fn new(start: f64, end: f64, speaker: impl Into<String>) -> Self {
        Self {
            start,
            end,
            speaker: speaker.into(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Length of the time both segments cover, zero if they are disjoint.
    pub fn overlap(&self, other: &DiarizationSegment) -> f64 {
        (self.end.min(other.end) - self.start.max(other.start)).max(0.0)
    }
}

pub fn total_duration(segments: &[DiarizationSegment]) -> f64 {
    segments.iter().map(DiarizationSegment::duration).sum()
}

/// Turns `[HH:MM:SS] Speaker: text` lines into consecutive speaker segments.
///
/// Each timestamped line opens a segment that ends where the next one
/// starts. The last segment ends at `audio_duration` when that lies after
/// its start, otherwise `config.tail()` seconds after it. Lines without a
/// speaker label are skipped; an unreadable timestamp counts as 0 seconds.
pub fn parse_diarization(
    text: &str,
    audio_duration: Option<f64>,
    config: &DiarizationConfig,
) -> Vec<DiarizationSegment> {
    let mut turns: Vec<(f64, &str)> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(parsed) = SpeakerLine::parse(line) else {
            log::debug!("Line {}: no speaker label, skipped", line_no + 1);
            continue;
        };
        let start = match parsed.start_seconds() {
            Some(Some(seconds)) => seconds,
            Some(None) => {
                log::debug!(
                    "Line {}: unreadable timestamp {:?}, using 0s",
                    line_no + 1,
                    parsed.timestamp.unwrap_or_default()
                );
                0.0
            }
            None => match config.missing_timestamp {
                MissingTimestampPolicy::Skip => continue,
                MissingTimestampPolicy::StartAtZero => 0.0,
            },
        };
        turns.push((start, parsed.speaker));
    }

    // Stable, so lines sharing a start time keep their order.
    turns.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut segments = Vec::with_capacity(turns.len());
    for (idx, &(start, speaker)) in turns.iter().enumerate() {
        let end = match turns.get(idx + 1) {
            Some(&(next_start, _)) => next_start,
            None => match audio_duration {
                Some(duration) if duration > start => duration,
                _ => start + config.tail(),
            },
        };
        segments.push(DiarizationSegment::new(start, end, speaker));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TRANSCRIPT: &str = "\
[00:00:00] SPEAKER_1: Hello there.
[00:00:04.200] SPEAKER_2: Hi, how are you?

[00:00:09] SPEAKER_1: Fine.";

    #[test]
    fn test_segments_chain_start_to_start() {
        let segments = parse_diarization(TRANSCRIPT, None, &DiarizationConfig::default());
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], DiarizationSegment::new(0.0, 4.2, "SPEAKER_1"));
        assert_relative_eq!(segments[1].start, 4.2);
        assert_relative_eq!(segments[1].end, 9.0);
        assert_eq!(segments[1].speaker, "SPEAKER_2");
    }

    #[test]
    fn test_last_segment_gets_default_tail() {
        let segments = parse_diarization(TRANSCRIPT, None, &DiarizationConfig::default());
        assert_relative_eq!(segments[2].end, 12.0);
    }

    #[test]
    fn test_last_segment_extends_to_audio_duration() {
        let segments = parse_diarization(TRANSCRIPT, Some(20.0), &DiarizationConfig::default());
        assert_relative_eq!(segments[2].end, 20.0);
    }

    #[test]
    fn test_audio_duration_before_last_start_falls_back_to_tail() {
        let config = DiarizationConfig::default().with_tail_seconds(1.5);
        let segments = parse_diarization(TRANSCRIPT, Some(5.0), &config);
        assert_relative_eq!(segments[2].end, 10.5);
    }

    #[test]
    fn test_negative_tail_keeps_segments_non_negative() {
        let config: DiarizationConfig =
            serde_json::from_str(r#"{"tail_seconds": -5.0}"#).unwrap();
        let segments = parse_diarization("[00:00:00] A: one\n[00:00:02] B: two", None, &config);
        assert_eq!(segments[1], DiarizationSegment::new(2.0, 2.0, "B"));
        assert!(segments.iter().all(|s| s.end >= s.start));
    }

    #[test]
    fn test_labels_followed_directly_by_content() {
        let text = "[00:00:00] A:hello\n[00:00:04] B:world";
        let segments = parse_diarization(text, None, &DiarizationConfig::default());
        assert_eq!(
            segments,
            vec![
                DiarizationSegment::new(0.0, 4.0, "A"),
                DiarizationSegment::new(4.0, 7.0, "B"),
            ]
        );
    }

    #[test]
    fn test_lines_without_label_are_skipped() {
        let text = "[00:00:00] A: one\njust words\n[00:00:02] B: two";
        let segments = parse_diarization(text, None, &DiarizationConfig::default());
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].speaker, "B");
    }

    #[test]
    fn test_malformed_timestamp_counts_as_zero() {
        let text = "[later] A: one\n[00:00:05] B: two";
        let segments = parse_diarization(text, None, &DiarizationConfig::default());
        assert_eq!(segments[0], DiarizationSegment::new(0.0, 5.0, "A"));
    }

    #[test]
    fn test_missing_timestamp_skipped_by_default() {
        let text = "A: untimed\n[00:00:02] B: timed";
        let segments = parse_diarization(text, None, &DiarizationConfig::default());
        assert_eq!(segments, vec![DiarizationSegment::new(2.0, 5.0, "B")]);
    }

    #[test]
    fn test_missing_timestamp_can_start_at_zero() {
        let text = "A: untimed\n[00:00:02] B: timed";
        let config =
            DiarizationConfig::default().with_missing_timestamp(MissingTimestampPolicy::StartAtZero);
        let segments = parse_diarization(text, None, &config);
        assert_eq!(segments[0], DiarizationSegment::new(0.0, 2.0, "A"));
        assert_eq!(segments[1].speaker, "B");
    }

    #[test]
    fn test_out_of_order_lines_are_sorted() {
        let text = "[00:00:05] B: later\n[00:00:01] A: earlier";
        let segments = parse_diarization(text, None, &DiarizationConfig::default());
        assert_eq!(segments[0], DiarizationSegment::new(1.0, 5.0, "A"));
        assert!(segments.iter().all(|s| s.end >= s.start));
    }

    #[test]
    fn test_empty_text_has_no_segments() {
        assert!(parse_diarization("", Some(10.0), &DiarizationConfig::default()).is_empty());
    }

    #[test]
    fn test_overlap_and_total_duration() {
        let a = DiarizationSegment::new(0.0, 4.0, "A");
        let b = DiarizationSegment::new(3.0, 6.0, "B");
        let c = DiarizationSegment::new(7.0, 8.0, "C");
        assert_relative_eq!(a.overlap(&b), 1.0);
        assert_relative_eq!(a.overlap(&c), 0.0);
        assert_relative_eq!(total_duration(&[a, b, c]), 8.0);
    }
}
