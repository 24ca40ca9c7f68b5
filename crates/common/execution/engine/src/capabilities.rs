pub const ENGINE_NEW_PAYLOAD_V2: &str = "engine_newPayloadV2";
pub const ENGINE_GET_PAYLOAD_V2: &str = "engine_getPayloadV2";
pub const ENGINE_FORKCHOICE_UPDATED_V2: &str = "engine_forkchoiceUpdatedV2";
pub const ENGINE_EXCHANGE_CAPABILITIES: &str = "engine_exchangeCapabilities";

pub const ETH_GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";

/// Engine API methods the driver calls during a round.
pub static REQUIRED_CAPABILITIES: &[&str] = &[
    ENGINE_NEW_PAYLOAD_V2,
    ENGINE_FORKCHOICE_UPDATED_V2,
    ENGINE_GET_PAYLOAD_V2,
];

/// Returns the first method in `required` that `supported` does not list.
pub fn first_missing<'a>(required: &[&'a str], supported: &[String]) -> Option<&'a str> {
    required
        .iter()
        .find(|method| !supported.iter().any(|supported| supported == *method))
        .copied()
}
