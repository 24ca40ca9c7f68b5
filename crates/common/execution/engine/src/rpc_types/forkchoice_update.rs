use std::fmt;

use alloy_primitives::{Address, B256, U64};
use serde::{Deserialize, Serialize};

use super::payload_status::PayloadStatus;
use crate::errors::EngineError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkchoiceState {
    pub head_block_hash: B256,
    pub safe_block_hash: B256,
    pub finalized_block_hash: B256,
}

impl ForkchoiceState {
    pub fn new(head_block_hash: B256, safe_block_hash: B256, finalized_block_hash: B256) -> Self {
        Self {
            head_block_hash,
            safe_block_hash,
            finalized_block_hash,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub index: U64,
    pub validator_index: U64,
    pub address: Address,
    /// Value of the withdrawal in Gwei.
    pub amount: U64,
}

impl Withdrawal {
    /// All-zero withdrawal. The V2 methods require a non-empty withdrawals list.
    pub fn placeholder() -> Self {
        Self {
            index: U64::ZERO,
            validator_index: U64::ZERO,
            address: Address::ZERO,
            amount: U64::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadAttributes {
    pub timestamp: U64,
    pub prev_randao: B256,
    pub suggested_fee_recipient: Address,
    pub withdrawals: Vec<Withdrawal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_beacon_block_root: Option<B256>,
}

/// Opaque identifier of a payload build job started by `engine_forkchoiceUpdatedV2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadId(String);

impl PayloadId {
    pub fn new(id: impl Into<String>) -> Result<Self, EngineError> {
        let id = id.into();
        if id.is_empty() {
            return Err(EngineError::Protocol("empty payload id".to_string()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PayloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkchoiceUpdateResult {
    pub payload_status: PayloadStatus,
    #[serde(default)]
    pub payload_id: Option<PayloadId>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_forkchoice_state_json() {
        let state = ForkchoiceState::new(
            B256::with_last_byte(0x10),
            B256::with_last_byte(0x01),
            B256::with_last_byte(0x11),
        );
        let expected = r#"{"headBlockHash":"0x0000000000000000000000000000000000000000000000000000000000000010","safeBlockHash":"0x0000000000000000000000000000000000000000000000000000000000000001","finalizedBlockHash":"0x0000000000000000000000000000000000000000000000000000000000000011"}"#;
        assert_eq!(serde_json::to_string(&state).unwrap(), expected);
    }

    #[test]
    fn test_payload_attributes_json() {
        let attributes = PayloadAttributes {
            timestamp: U64::from(0x1235),
            prev_randao: B256::with_last_byte(0x01),
            suggested_fee_recipient: Address::with_last_byte(0x37),
            withdrawals: vec![Withdrawal {
                index: U64::from(1),
                validator_index: U64::from(2),
                address: Address::with_last_byte(0x12),
                amount: U64::from(0x100),
            }],
            parent_beacon_block_root: None,
        };
        assert_eq!(
            serde_json::to_value(&attributes).unwrap(),
            json!({
                "timestamp": "0x1235",
                "prevRandao": "0x0000000000000000000000000000000000000000000000000000000000000001",
                "suggestedFeeRecipient": "0x0000000000000000000000000000000000000037",
                "withdrawals": [{
                    "index": "0x1",
                    "validatorIndex": "0x2",
                    "address": "0x0000000000000000000000000000000000000012",
                    "amount": "0x100",
                }],
            })
        );
    }

    #[test]
    fn test_forkchoice_update_result_without_payload_id() {
        let result: ForkchoiceUpdateResult = serde_json::from_value(json!({
            "payloadStatus": {"status": "SYNCING", "latestValidHash": null, "validationError": null},
            "payloadId": null,
        }))
        .unwrap();
        assert_eq!(result.payload_id, None);
    }

    #[test]
    fn test_empty_payload_id_is_rejected() {
        assert!(matches!(PayloadId::new(""), Err(EngineError::Protocol(_))));
        assert_eq!(PayloadId::new("0xabc").unwrap().as_str(), "0xabc");
    }
}
