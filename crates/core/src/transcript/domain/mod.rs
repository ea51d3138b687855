pub mod speaker_line;
