use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::core::config::StorageConfig;
use crate::models::record::StoredRecord;
use crate::models::user::UserAccount;
use crate::stores::{record_store::RecordStore, user_store::UserStore};
use crate::wal::wal::Wal;

pub const RECORDS_WAL: &str = "records.wal";
pub const USERS_WAL: &str = "users.wal";

// this runs at boot time
pub fn open_record_store(storage: &StorageConfig) -> Result<RecordStore> {
    let wal: Wal<StoredRecord> = Wal::new(journal_path(&storage.data_dir, RECORDS_WAL)?)
        .context("Failed to open record journal")?;
    let operations = wal.replay().context("Failed to replay record journal")?;
    let replayed = operations.len();

    let store = RecordStore::new(wal);
    for op in operations {
        store.apply(op);
    }

    info!(
        operations_replayed = replayed,
        records_loaded = store.len(),
        "Record journal replayed"
    );
    Ok(store)
}

pub fn open_user_store(storage: &StorageConfig) -> Result<UserStore> {
    let wal: Wal<UserAccount> = Wal::new(journal_path(&storage.data_dir, USERS_WAL)?)
        .context("Failed to open user journal")?;
    let operations = wal.replay().context("Failed to replay user journal")?;
    let replayed = operations.len();

    let store = UserStore::new(wal);
    for op in operations {
        store.apply(op);
    }

    info!(
        operations_replayed = replayed,
        users_loaded = store.len(),
        "User journal replayed"
    );
    Ok(store)
}

fn journal_path(data_dir: &Path, file: &str) -> Result<std::path::PathBuf> {
    std::fs::create_dir_all(data_dir)
        .context(format!("Failed to create data directory {}", data_dir.display()))?;
    Ok(data_dir.join(file))
}
