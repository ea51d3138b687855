pub mod compare_transcripts_use_case;
pub mod comparison_executor;
pub mod comparison_logger;
pub mod infrastructure;
