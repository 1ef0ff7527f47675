//! This module provides the core abstractions over the backing store:
//! - Journal deletion
//! - Snapshot probing and deletion
//! - Point-in-time enumeration of known persistence identifiers
//!
//! The engine owns no persisted state of its own; it only reads and deletes
//! state owned by these collaborators.

mod sled_adapter;


use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use serde::Serialize;
#[doc(hidden)]
pub use sled_adapter::*;

use crate::PersistenceId;
use crate::Result;
use crate::StoreError;

/// Selects which snapshots a deletion request applies to.
///
/// The repair engine always deletes everything, so the interesting
/// constructor is [`SnapshotSelectionCriteria::all`]; the bounds exist
/// because stores expose range deletion and mocks need to observe what was
/// requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSelectionCriteria {
    /// Upper bound on sequence number (inclusive)
    pub max_sequence_nr: u64,
    /// Upper bound on capture timestamp, unix millis (inclusive)
    pub max_timestamp_millis: u64,
    /// Lower bound on sequence number (inclusive)
    pub min_sequence_nr: u64,
    /// Lower bound on capture timestamp, unix millis (inclusive)
    pub min_timestamp_millis: u64,
}

impl SnapshotSelectionCriteria {
    /// All timestamps, all sequence numbers below the maximum.
    pub fn all() -> Self {
        Self {
            max_sequence_nr: u64::MAX,
            max_timestamp_millis: u64::MAX,
            min_sequence_nr: 0,
            min_timestamp_millis: 0,
        }
    }

    pub fn matches(
        &self,
        sequence_nr: u64,
        timestamp_millis: u64,
    ) -> bool {
        (self.min_sequence_nr..=self.max_sequence_nr).contains(&sequence_nr)
            && (self.min_timestamp_millis..=self.max_timestamp_millis).contains(&timestamp_millis)
    }
}

/// Journal half of the backing store.
///
/// Implementations must treat deletion of an empty journal as a success:
/// the repair workflow relies on no-op deletes being acknowledged.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait JournalStore: Send + Sync + 'static {
    /// Deletes all journaled messages for `id` up to `to_sequence_nr`
    /// (inclusive).
    async fn delete_messages_up_to(
        &self,
        id: &PersistenceId,
        to_sequence_nr: u64,
    ) -> Result<()>;
}

/// Snapshot half of the backing store.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SnapshotStore: Send + Sync + 'static {
    /// Best-effort probe for prior snapshot existence.
    ///
    /// Used only to decide whether a snapshot deletion must also be issued;
    /// an explicit call rather than a side effect of recovery so it can be
    /// tested independently.
    async fn has_snapshot(
        &self,
        id: &PersistenceId,
    ) -> Result<bool>;

    /// Deletes every snapshot of `id` matching `criteria`.
    async fn delete_matching(
        &self,
        id: &PersistenceId,
        criteria: SnapshotSelectionCriteria,
    ) -> Result<()>;
}

/// Read-side capability: enumerate the identifiers the store knows about.
#[cfg_attr(test, automock)]
pub trait PersistenceIdsQuery: Send + Sync + 'static {
    /// Opens a point-in-time sequence of all known persistence identifiers.
    ///
    /// The sequence is finite and restartable only by calling again; it may
    /// fail mid-stream, surfaced as an `Err` item.
    fn current_persistence_ids(&self) -> BoxStream<'static, Result<String>>;
}

/// Resolves plugin ids to concrete store handles.
///
/// Mirrors the persistence-plugin indirection of the hosting system: one
/// process may carry several journal/snapshot backends side by side, keyed
/// by plugin id.
#[cfg_attr(test, automock)]
pub trait StoreProvider: Send + Sync + 'static {
    fn journal_store(
        &self,
        plugin_id: &str,
    ) -> Result<Arc<dyn JournalStore>>;

    fn snapshot_store(
        &self,
        plugin_id: &str,
    ) -> Result<Arc<dyn SnapshotStore>>;

    fn persistence_ids_query(&self) -> Result<Arc<dyn PersistenceIdsQuery>>;
}

/// Provider backed by a single store serving one journal plugin id and one
/// snapshot plugin id.
pub struct SingleStoreProvider<S> {
    journal_plugin_id: String,
    snapshot_plugin_id: String,
    store: Arc<S>,
}

impl<S> SingleStoreProvider<S>
where S: JournalStore + SnapshotStore + PersistenceIdsQuery
{
    pub fn new(
        journal_plugin_id: impl Into<String>,
        snapshot_plugin_id: impl Into<String>,
        store: Arc<S>,
    ) -> Self {
        Self {
            journal_plugin_id: journal_plugin_id.into(),
            snapshot_plugin_id: snapshot_plugin_id.into(),
            store,
        }
    }
}

impl<S> StoreProvider for SingleStoreProvider<S>
where S: JournalStore + SnapshotStore + PersistenceIdsQuery
{
    fn journal_store(
        &self,
        plugin_id: &str,
    ) -> Result<Arc<dyn JournalStore>> {
        if plugin_id != self.journal_plugin_id {
            return Err(StoreError::UnknownPlugin(plugin_id.to_string()).into());
        }
        Ok(self.store.clone())
    }

    fn snapshot_store(
        &self,
        plugin_id: &str,
    ) -> Result<Arc<dyn SnapshotStore>> {
        if plugin_id != self.snapshot_plugin_id {
            return Err(StoreError::UnknownPlugin(plugin_id.to_string()).into());
        }
        Ok(self.store.clone())
    }

    fn persistence_ids_query(&self) -> Result<Arc<dyn PersistenceIdsQuery>> {
        Ok(self.store.clone())
    }
}
