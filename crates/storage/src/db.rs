use std::{path::PathBuf, sync::Arc};

use redb::{Builder, Database};
use tracing::info;

use crate::{errors::StoreError, tables::consensus_state::ConsensusStateField};

pub const REDB_FILE: &str = "procyon.redb";

/// The size of the cache for the database
///
/// 64 MiB. The database holds a single small record.
pub const REDB_CACHE_SIZE: usize = 64 * 1_024 * 1_024;

#[derive(Clone, Debug)]
pub struct ProcyonDB {
    pub db: Arc<Database>,
    pub data_dir: PathBuf,
}

impl ProcyonDB {
    pub fn new(data_dir: PathBuf) -> Result<Self, StoreError> {
        let db = Builder::new()
            .set_cache_size(REDB_CACHE_SIZE)
            .create(data_dir.join(REDB_FILE))?;
        info!(path = ?data_dir.join(REDB_FILE), "Opened database");

        Ok(Self {
            db: Arc::new(db),
            data_dir,
        })
    }

    pub fn consensus_state_provider(&self) -> ConsensusStateField {
        ConsensusStateField {
            db: self.db.clone(),
        }
    }
}
