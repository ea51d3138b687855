use std::sync::OnceLock;

use regex::Regex;

use crate::shared::constants::MAX_SPEAKER_LABEL_CHARS;

/// `[timestamp] Label: content`, timestamp optional.
///
/// The label may contain inner spaces but no brackets or colons. Content may
/// follow the colon directly (`A:hello`); see [`continues_token`] for the
/// cases that are not headers.
fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<header>\s*(?:\[(?P<ts>[^\]]*)\]\s*)?(?P<label>[^\[\]:\s](?:[^\[\]:]*[^\[\]:\s])?)\s*:)(?P<content>.*)$",
        )
        .expect("speaker header pattern is valid")
    })
}

/// One transcript line split into its speaker header and spoken content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerLine<'a> {
    /// Everything up to and including the label's colon, verbatim.
    pub header: &'a str,
    /// Raw text between the brackets, if the line had a timestamp.
    pub timestamp: Option<&'a str>,
    pub speaker: &'a str,
    /// Spoken text with surrounding whitespace trimmed.
    pub content: &'a str,
}

impl<'a> SpeakerLine<'a> {
    /// Returns `None` when the line has no speaker label.
    pub fn parse(line: &'a str) -> Option<Self> {
        let caps = header_pattern().captures(line)?;
        let speaker = caps.name("label")?.as_str();
        if speaker.chars().count() > MAX_SPEAKER_LABEL_CHARS {
            return None;
        }
        let rest = caps.name("content").map_or("", |m| m.as_str());
        if continues_token(rest) {
            return None;
        }
        Some(Self {
            header: caps.name("header")?.as_str(),
            timestamp: caps.name("ts").map(|m| m.as_str()),
            speaker,
            content: rest.trim(),
        })
    }

    /// Timestamp in seconds. `None` if the line has no brackets;
    /// `Some(None)` if the brackets hold something unparsable.
    pub fn start_seconds(&self) -> Option<Option<f64>> {
        self.timestamp.map(parse_timestamp)
    }
}

/// True when the text right after the colon makes it part of a clock time or
/// ratio (`5:30`, `3:1`) or a URL (`https://`), rather than ending a label.
fn continues_token(rest: &str) -> bool {
    rest.starts_with(|c: char| c.is_ascii_digit()) || rest.starts_with("//")
}

/// Parses `HH:MM:SS`, `HH:MM:SS.mmm` or `MM:SS` into seconds.
pub fn parse_timestamp(raw: &str) -> Option<f64> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (parse_whole(h)?, parse_whole(m)?, parse_seconds(s)?),
        [m, s] => (0, parse_whole(m)?, parse_seconds(s)?),
        _ => return None,
    };
    Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

fn parse_whole(part: &str) -> Option<u64> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn parse_seconds(part: &str) -> Option<f64> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    part.parse::<f64>().ok().filter(|s| s.is_finite())
}

/// Removes timestamps and speaker labels, joining the spoken content of all
/// lines with single spaces.
pub fn strip_speaker_tags(text: &str) -> String {
    text.lines()
        .map(|line| match SpeakerLine::parse(line) {
            Some(parsed) => parsed.content,
            None => line.trim(),
        })
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
