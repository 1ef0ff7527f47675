//! Sled-backed implementation of the store capabilities.
//!
//! Two trees, one for journal rows and one for snapshot rows, both keyed
//! `persistence_id \x00 big-endian sequence_nr` so that per-identifier rows
//! form a contiguous prefix range. Snapshot values carry the capture
//! timestamp in their first eight bytes.

use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;
use futures::stream;
use futures::stream::BoxStream;
use tracing::debug;
use tracing::warn;

use crate::JournalStore;
use crate::PersistenceId;
use crate::PersistenceIdsQuery;
use crate::Result;
use crate::SnapshotSelectionCriteria;
use crate::SnapshotStore;
use crate::StoreError;

const JOURNAL_TREE: &str = "journal";
const SNAPSHOT_TREE: &str = "snapshots";

/// Separator between identifier and sequence number in row keys. Persistence
/// identifiers are path-like strings and never contain NUL.
const KEY_SEPARATOR: u8 = 0x00;

pub struct SledStore {
    journal: sled::Tree,
    snapshots: sled::Tree,
}

impl SledStore {
    pub fn open(path: impl AsRef<Path> + std::fmt::Debug) -> std::result::Result<Self, std::io::Error> {
        debug!("open sled repair store from path: {:?}", &path);

        let db = sled::Config::default()
            .path(path.as_ref())
            .use_compression(true)
            .compression_factor(1)
            .open()
            .map_err(|e| {
                warn!("Try to open DB at this location: {:?} and failed: {:?}", path, e);
                std::io::Error::other(e)
            })?;

        Ok(Self {
            journal: db.open_tree(JOURNAL_TREE).map_err(std::io::Error::other)?,
            snapshots: db.open_tree(SNAPSHOT_TREE).map_err(std::io::Error::other)?,
        })
    }

    /// Appends one journal row. Fixture-facing: the engine itself never
    /// writes journal data.
    pub fn append_journal(
        &self,
        id: &PersistenceId,
        sequence_nr: u64,
        payload: &[u8],
    ) -> Result<()> {
        self.journal
            .insert(row_key(id.as_str(), sequence_nr), payload)
            .map_err(|e| StoreError::Journal(e.to_string()))?;
        Ok(())
    }

    /// Saves one snapshot row. Fixture-facing, like [`Self::append_journal`].
    pub fn save_snapshot(
        &self,
        id: &PersistenceId,
        sequence_nr: u64,
        timestamp_millis: u64,
        payload: &[u8],
    ) -> Result<()> {
        let mut value = timestamp_millis.to_be_bytes().to_vec();
        value.extend_from_slice(payload);
        self.snapshots
            .insert(row_key(id.as_str(), sequence_nr), value)
            .map_err(|e| StoreError::Snapshot(e.to_string()))?;
        Ok(())
    }

    /// Number of journal rows stored for `id`.
    pub fn journal_count(
        &self,
        id: &PersistenceId,
    ) -> Result<usize> {
        count_prefix(&self.journal, id.as_str()).map_err(|e| StoreError::Journal(e.to_string()).into())
    }

    /// Number of snapshot rows stored for `id`.
    pub fn snapshot_count(
        &self,
        id: &PersistenceId,
    ) -> Result<usize> {
        count_prefix(&self.snapshots, id.as_str()).map_err(|e| StoreError::Snapshot(e.to_string()).into())
    }
}

#[async_trait]
impl JournalStore for SledStore {
    async fn delete_messages_up_to(
        &self,
        id: &PersistenceId,
        to_sequence_nr: u64,
    ) -> Result<()> {
        for row in self.journal.scan_prefix(id_prefix(id.as_str())) {
            let (key, _) = row.map_err(|e| StoreError::Journal(e.to_string()))?;
            match sequence_nr_of(&key) {
                Some(seq) if seq <= to_sequence_nr => {
                    self.journal.remove(&key).map_err(|e| StoreError::Journal(e.to_string()))?;
                }
                Some(_) => {}
                None => {
                    return Err(StoreError::Journal(format!(
                        "malformed journal row key for [{id}]"
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for SledStore {
    async fn has_snapshot(
        &self,
        id: &PersistenceId,
    ) -> Result<bool> {
        let mut rows = self.snapshots.scan_prefix(id_prefix(id.as_str()));
        match rows.next() {
            Some(Ok(_)) => Ok(true),
            Some(Err(e)) => Err(StoreError::Snapshot(e.to_string()).into()),
            None => Ok(false),
        }
    }

    async fn delete_matching(
        &self,
        id: &PersistenceId,
        criteria: SnapshotSelectionCriteria,
    ) -> Result<()> {
        for row in self.snapshots.scan_prefix(id_prefix(id.as_str())) {
            let (key, value) = row.map_err(|e| StoreError::Snapshot(e.to_string()))?;
            let seq = sequence_nr_of(&key).ok_or_else(|| {
                StoreError::Snapshot(format!("malformed snapshot row key for [{id}]"))
            })?;
            let timestamp = timestamp_of(&value).ok_or_else(|| {
                StoreError::Snapshot(format!("malformed snapshot row value for [{id}]"))
            })?;
            if criteria.matches(seq, timestamp) {
                self.snapshots.remove(&key).map_err(|e| StoreError::Snapshot(e.to_string()))?;
            }
        }
        Ok(())
    }
}

impl PersistenceIdsQuery for SledStore {
    fn current_persistence_ids(&self) -> BoxStream<'static, Result<String>> {
        // Point-in-time: materialize the distinct ids up front so the
        // stream stays valid while deletions proceed elsewhere.
        let mut ids: BTreeSet<String> = BTreeSet::new();
        let mut failure: Option<StoreError> = None;

        for row in self.journal.iter().keys().chain(self.snapshots.iter().keys()) {
            match row {
                Ok(key) => {
                    if let Some(id) = id_of(&key) {
                        ids.insert(id);
                    }
                }
                Err(e) => {
                    failure = Some(StoreError::Query(e.to_string()));
                    break;
                }
            }
        }

        let items: Vec<Result<String>> = ids
            .into_iter()
            .map(Ok)
            .chain(failure.map(|e| Err(e.into())))
            .collect();
        Box::pin(stream::iter(items))
    }
}

fn row_key(
    id: &str,
    sequence_nr: u64,
) -> Vec<u8> {
    let mut key = id_prefix(id);
    key.extend_from_slice(&sequence_nr.to_be_bytes());
    key
}

fn id_prefix(id: &str) -> Vec<u8> {
    let mut prefix = id.as_bytes().to_vec();
    prefix.push(KEY_SEPARATOR);
    prefix
}

// The sequence-number suffix may itself contain NUL bytes, so the separator
// is located by fixed offset from the end, not by scanning.
fn separator_position(key: &[u8]) -> Option<usize> {
    let sep = key.len().checked_sub(9)?;
    (key[sep] == KEY_SEPARATOR).then_some(sep)
}

fn sequence_nr_of(key: &[u8]) -> Option<u64> {
    let sep = separator_position(key)?;
    let bytes: [u8; 8] = key[sep + 1..].try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

fn id_of(key: &[u8]) -> Option<String> {
    let sep = separator_position(key)?;
    String::from_utf8(key[..sep].to_vec()).ok()
}

fn timestamp_of(value: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = value.get(..8)?.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

fn count_prefix(
    tree: &sled::Tree,
    id: &str,
) -> std::result::Result<usize, sled::Error> {
    let mut count = 0;
    for row in tree.scan_prefix(id_prefix(id)) {
        row?;
        count += 1;
    }
    Ok(count)
}
