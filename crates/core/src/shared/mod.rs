pub mod config;
pub mod constants;
pub mod rate;
pub mod tokenizer;
