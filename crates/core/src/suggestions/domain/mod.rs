pub mod suggestion;
pub mod suggestion_miner;
