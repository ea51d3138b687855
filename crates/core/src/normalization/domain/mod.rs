pub mod equivalence_map;
pub mod text_normalizer;
pub mod word_mapper;
