pub mod block;
pub mod execution_payload;
pub mod forkchoice_update;
pub mod json_rpc;
pub mod payload_status;
