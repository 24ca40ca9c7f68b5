pub mod consensus_state;
