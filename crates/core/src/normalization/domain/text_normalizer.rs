use super::equivalence_map::EquivalenceMap;
use super::word_mapper::WordMapper;
use crate::transcript::domain::speaker_line::SpeakerLine;

/// Lower-cases, drops everything that is neither alphanumeric nor
/// whitespace (underscores included) and collapses whitespace.
pub fn fold_content(content: &str) -> String {
    let cleaned: String = content
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes a transcript line by line for comparison.
///
/// Speaker headers are kept exactly as written, leading indentation
/// included; only the spoken content is mapped through the equivalence map
/// and folded.
pub fn normalize_text(text: &str, map: &EquivalenceMap) -> String {
    let mapper = match WordMapper::new(map) {
        Ok(mapper) => mapper,
        Err(e) => {
            log::warn!("Word map could not be compiled, normalizing without it: {e}");
            WordMapper::identity()
        }
    };
    TextNormalizer::new(mapper).normalize(text)
}

/// Line normalizer holding a compiled word mapper, for callers that
/// normalize many texts with the same map.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    mapper: WordMapper,
}

impl TextNormalizer {
    pub fn new(mapper: WordMapper) -> Self {
        Self { mapper }
    }

    pub fn normalize(&self, text: &str) -> String {
        text.lines()
            .map(|line| self.normalize_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn normalize_line(&self, line: &str) -> String {
        match SpeakerLine::parse(line) {
            Some(parsed) => {
                let header = parsed.header;
                let content = fold_content(&self.mapper.apply(parsed.content));
                if content.is_empty() {
                    header.to_string()
                } else {
                    format!("{header} {content}")
                }
            }
            None => fold_content(&self.mapper.apply(line)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello, World!", "hello world")]
    #[case("  snake_case   and\tTABS ", "snakecase and tabs")]
    #[case("Ça va? Très bien.", "ça va très bien")]
    #[case("...", "")]
    fn test_fold_content(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(fold_content(input), expected);
    }

    #[test]
    fn test_header_is_preserved_verbatim() {
        let map = EquivalenceMap::from_json(r#"{"behavior": ["behaviour"]}"#).unwrap();
        let text = "[00:00:01] SPEAKER_1: His Behaviour, was ODD!\nno tag here...";
        assert_eq!(
            normalize_text(text, &map),
            "[00:00:01] SPEAKER_1: his behavior was odd\nno tag here"
        );
    }

    #[test]
    fn test_indented_header_keeps_its_indentation() {
        assert_eq!(
            normalize_text("  [00:00:02] Bob: Hi THERE", &EquivalenceMap::new()),
            "  [00:00:02] Bob: hi there"
        );
    }

    #[test]
    fn test_content_directly_after_colon_is_folded_apart_from_label() {
        let once = normalize_text("A:Hello, World", &EquivalenceMap::new());
        assert_eq!(once, "A: hello world");
        assert_eq!(normalize_text(&once, &EquivalenceMap::new()), once);
    }

    #[test]
    fn test_header_only_line_has_no_trailing_space() {
        assert_eq!(normalize_text("Alice:", &EquivalenceMap::new()), "Alice:");
    }

    #[test]
    fn test_line_count_is_kept() {
        let text = "A: one\n\nB: two";
        assert_eq!(normalize_text(text, &EquivalenceMap::new()), "A: one\n\nB: two");
    }

    #[test]
    fn test_normalizing_twice_changes_nothing() {
        let map = EquivalenceMap::from_json(r#"{"ok": ["okay"]}"#).unwrap();
        let once = normalize_text("Bob: Okay, fine.\nOKAY then", &map);
        assert_eq!(normalize_text(&once, &map), once);
    }

    #[test]
    fn test_clock_times_are_not_headers() {
        assert_eq!(
            normalize_text("Meet at 5:30 today", &EquivalenceMap::new()),
            "meet at 530 today"
        );
    }
}
