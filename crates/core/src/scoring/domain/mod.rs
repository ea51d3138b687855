pub mod der;
pub mod diarization;
pub mod wer;
