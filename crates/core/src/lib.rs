pub mod alignment;
pub mod normalization;
pub mod pipeline;
pub mod scoring;
pub mod shared;
pub mod suggestions;
pub mod transcript;

pub use alignment::domain::diff_renderer::compute_diff_markup;
pub use normalization::domain::text_normalizer::normalize_text;
pub use normalization::domain::word_mapper::apply_word_map;
pub use scoring::domain::der::calculate_der;
pub use scoring::domain::wer::calculate_wer;
pub use suggestions::domain::suggestion_miner::extract_substitutions;
pub use transcript::domain::speaker_line::strip_speaker_tags;
