//! Store wiring for the session

use hoken_store::{ClaimStore, FileStorage, PolicyStore};
use hoken_types::Result;

use crate::config::Config;

/// Open the policy and claim lists under the configured data directory
pub fn open_file_stores(
    config: &Config,
) -> Result<(PolicyStore<FileStorage>, ClaimStore<FileStorage>)> {
    let storage = FileStorage::open(config.data_dir()?)?;
    Ok((
        PolicyStore::policies(storage.clone()),
        ClaimStore::claims(storage),
    ))
}
