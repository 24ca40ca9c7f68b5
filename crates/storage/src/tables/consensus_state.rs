use std::sync::Arc;

use procyon_consensus::state::ConsensusState;
use redb::{Database, ReadableDatabase, TableDefinition};
use ssz::{Decode, Encode};

use crate::errors::StoreError;

/// Durable access to the single [`ConsensusState`] record.
pub trait ConsensusStateStore {
    /// Returns the zero state when nothing has been committed yet.
    fn get(&self) -> Result<ConsensusState, StoreError>;

    fn set(&self, state: ConsensusState) -> Result<(), StoreError>;
}

/// Table definition for the Consensus State table
///
/// Key: fixed [`CONSENSUS_STATE_KEY`]
/// Value: SSZ encoded [`ConsensusState`]
pub const CONSENSUS_STATE_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("consensus_state");

pub const CONSENSUS_STATE_KEY: &str = "consensus_state_key";

pub struct ConsensusStateField {
    pub db: Arc<Database>,
}

impl ConsensusStateStore for ConsensusStateField {
    fn get(&self) -> Result<ConsensusState, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(CONSENSUS_STATE_TABLE) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(ConsensusState::default()),
            Err(err) => return Err(err.into()),
        };
        let Some(value) = table.get(CONSENSUS_STATE_KEY)? else {
            return Ok(ConsensusState::default());
        };
        ConsensusState::from_ssz_bytes(value.value()).map_err(|err| StoreError::Decode {
            field: "consensus state",
            message: format!("{err:?}"),
        })
    }

    fn set(&self, state: ConsensusState) -> Result<(), StoreError> {
        let mut write_txn = self.db.begin_write()?;
        write_txn.set_durability(redb::Durability::Immediate)?;
        {
            let mut table = write_txn.open_table(CONSENSUS_STATE_TABLE)?;
            table.insert(CONSENSUS_STATE_KEY, state.as_ssz_bytes().as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
