use serde::Serialize;

use super::diarization::{parse_diarization, total_duration, DiarizationSegment};
use crate::shared::config::DiarizationConfig;
use crate::shared::rate::serialize_rate;

/// Duration-weighted diarization error rate and its components (seconds).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerMetrics {
    #[serde(serialize_with = "serialize_rate")]
    pub der: f64,
    pub speaker_confusion: f64,
    pub missed_speech: f64,
    pub false_alarm: f64,
    pub reference_duration: f64,
}

impl DerMetrics {
    fn degenerate(der: f64) -> Self {
        Self {
            der,
            speaker_confusion: 0.0,
            missed_speech: 0.0,
            false_alarm: 0.0,
            reference_duration: 0.0,
        }
    }

    /// Scores hypothesis segments against reference segments.
    ///
    /// Every reference/hypothesis pair contributes its temporal overlap;
    /// overlap with an identical speaker label (case-sensitive) is correct,
    /// the rest is confusion. Labels are not permuted to find a best mapping.
    pub fn from_segments(
        reference: &[DiarizationSegment],
        hypothesis: &[DiarizationSegment],
    ) -> Self {
        let reference_duration = total_duration(reference);
        if reference_duration <= 0.0 {
            return Self::degenerate(if hypothesis.is_empty() { 0.0 } else { 1.0 });
        }
        let hypothesis_duration = total_duration(hypothesis);

        let mut total_overlap = 0.0;
        let mut correct_overlap = 0.0;
        for ref_seg in reference {
            for hyp_seg in hypothesis {
                let overlap = ref_seg.overlap(hyp_seg);
                if overlap <= 0.0 {
                    continue;
                }
                total_overlap += overlap;
                if ref_seg.speaker == hyp_seg.speaker {
                    correct_overlap += overlap;
                }
            }
        }

        let speaker_confusion = (total_overlap - correct_overlap).max(0.0);
        let missed_speech = (reference_duration - total_overlap).max(0.0);
        let false_alarm = (hypothesis_duration - total_overlap).max(0.0);
        let der = (speaker_confusion + missed_speech + false_alarm) / reference_duration;

        log::debug!(
            "DER {der:.4}: confusion={speaker_confusion:.3}s missed={missed_speech:.3}s \
             false_alarm={false_alarm:.3}s over {reference_duration:.3}s"
        );

        Self {
            der,
            speaker_confusion,
            missed_speech,
            false_alarm,
            reference_duration,
        }
    }
}

/// Parses both tagged transcripts and scores speaker attribution.
///
/// The reference is parsed without an audio length; its last segment end is
/// then used as the audio length when parsing the hypothesis, so both tails
/// stop at the same point.
pub fn calculate_der(reference: &str, hypothesis: &str, config: &DiarizationConfig) -> DerMetrics {
    let ref_segments = parse_diarization(reference, None, config);
    if total_duration(&ref_segments) <= 0.0 {
        let has_speech = !parse_diarization(hypothesis, None, config).is_empty();
        return DerMetrics::degenerate(if has_speech { 1.0 } else { 0.0 });
    }

    let audio_duration = ref_segments
        .iter()
        .map(|segment| segment.end)
        .fold(0.0, f64::max);
    let hyp_segments = parse_diarization(hypothesis, Some(audio_duration), config);
    DerMetrics::from_segments(&ref_segments, &hyp_segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(start: f64, end: f64, speaker: &str) -> DiarizationSegment {
        DiarizationSegment::new(start, end, speaker)
    }

    #[test]
    fn test_identical_segments_have_zero_der() {
        let segments = vec![seg(0.0, 4.2, "SPEAKER_1"), seg(4.2, 9.0, "SPEAKER_2")];
        let m = DerMetrics::from_segments(&segments, &segments);
        assert_relative_eq!(m.der, 0.0);
        assert_relative_eq!(m.reference_duration, 9.0);
    }

    #[test]
    fn test_swapped_labels_are_full_confusion() {
        let reference = vec![seg(0.0, 4.2, "SPEAKER_1"), seg(4.2, 9.0, "SPEAKER_2")];
        let hypothesis = vec![seg(0.0, 4.2, "SPEAKER_2"), seg(4.2, 9.0, "SPEAKER_1")];
        let m = DerMetrics::from_segments(&reference, &hypothesis);
        assert_relative_eq!(m.der, 1.0);
        assert_relative_eq!(m.speaker_confusion, 9.0);
        assert_relative_eq!(m.missed_speech, 0.0);
        assert_relative_eq!(m.false_alarm, 0.0);
    }

    #[test]
    fn test_missed_and_false_alarm_components() {
        let reference = vec![seg(0.0, 10.0, "A")];
        let hypothesis = vec![seg(5.0, 12.0, "A")];
        let m = DerMetrics::from_segments(&reference, &hypothesis);
        assert_relative_eq!(m.missed_speech, 5.0);
        assert_relative_eq!(m.false_alarm, 2.0);
        assert_relative_eq!(m.speaker_confusion, 0.0);
        assert_relative_eq!(m.der, 0.7);
    }

    #[test]
    fn test_der_equals_sum_of_components() {
        let reference = vec![seg(0.0, 3.0, "A"), seg(3.0, 7.0, "B")];
        let hypothesis = vec![seg(1.0, 5.0, "A"), seg(5.0, 8.0, "b")];
        let m = DerMetrics::from_segments(&reference, &hypothesis);
        let sum = m.speaker_confusion + m.missed_speech + m.false_alarm;
        assert_relative_eq!(m.der, sum / m.reference_duration);
    }

    #[test]
    fn test_labels_compare_case_sensitively() {
        let reference = vec![seg(0.0, 2.0, "alice")];
        let hypothesis = vec![seg(0.0, 2.0, "Alice")];
        let m = DerMetrics::from_segments(&reference, &hypothesis);
        assert_relative_eq!(m.der, 1.0);
    }

    #[test]
    fn test_empty_reference_with_speech_is_one() {
        let m = calculate_der("no tags here", "[00:00:01] A: hello", &DiarizationConfig::default());
        assert_relative_eq!(m.der, 1.0);
    }

    #[test]
    fn test_empty_reference_and_hypothesis_is_zero() {
        let m = calculate_der("", "plain words", &DiarizationConfig::default());
        assert_relative_eq!(m.der, 0.0);
    }

    #[test]
    fn test_text_der_uses_reference_end_as_hypothesis_tail() {
        let reference = "[00:00:00] SPEAKER_1: hello\n[00:00:04] SPEAKER_2: hi";
        let hypothesis = "[00:00:00] SPEAKER_1: hello\n[00:00:05] SPEAKER_2: hi";
        let m = calculate_der(reference, hypothesis, &DiarizationConfig::default());
        // Reference: 0-4 S1, 4-7 S2. Hypothesis: 0-5 S1, 5-7 S2.
        assert_relative_eq!(m.reference_duration, 7.0);
        assert_relative_eq!(m.speaker_confusion, 1.0);
        assert_relative_eq!(m.missed_speech, 0.0);
        assert_relative_eq!(m.false_alarm, 0.0);
        assert_relative_eq!(m.der, 1.0 / 7.0);
    }

    #[test]
    fn test_text_der_swapped_speakers() {
        let reference = "[00:00:00] SPEAKER_1: a\n[00:00:04.200] SPEAKER_2: b";
        let hypothesis = "[00:00:00] SPEAKER_2: a\n[00:00:04.200] SPEAKER_1: b";
        let m = calculate_der(reference, hypothesis, &DiarizationConfig::default());
        assert_relative_eq!(m.der, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_text_der_swapped_speakers_without_space_after_colon() {
        let reference = "[00:00:00] A:hello\n[00:00:04] B:world";
        let hypothesis = "[00:00:00] B:hello\n[00:00:04] A:world";
        let m = calculate_der(reference, hypothesis, &DiarizationConfig::default());
        assert_relative_eq!(m.reference_duration, 7.0);
        assert_relative_eq!(m.speaker_confusion, 7.0);
        assert_relative_eq!(m.der, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_tail_from_settings_is_ignored() {
        let config: DiarizationConfig = serde_json::from_str(r#"{"tail_seconds": -5.0}"#).unwrap();
        let reference = "[00:00:00] A: one\n[00:00:02] B: two";
        let m = calculate_der(reference, reference, &config);
        assert_relative_eq!(m.reference_duration, 2.0);
        assert_relative_eq!(m.der, 0.0);
    }
}
