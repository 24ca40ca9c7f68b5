pub mod cli;
pub mod local_consensus;
pub mod startup_message;
