pub mod diff_renderer;
pub mod edit_script;
pub mod sequence_aligner;
