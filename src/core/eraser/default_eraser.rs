use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::PersistenceIdEraser;
use super::Removals;
use crate::JournalStore;
use crate::PersistenceId;
use crate::Result;
use crate::SnapshotSelectionCriteria;
use crate::SnapshotStore;

/// Default implementation over the configured journal and snapshot stores.
pub struct DefaultEraser {
    journal: Arc<dyn JournalStore>,
    snapshots: Arc<dyn SnapshotStore>,
}

#[async_trait]
impl PersistenceIdEraser for DefaultEraser {
    async fn erase(
        &self,
        id: &PersistenceId,
    ) -> Result<Removals> {
        // Probe first: whether a snapshot deletion must be issued at all.
        let has_snapshots = self.snapshots.has_snapshot(id).await?;
        debug!("erase [{}], snapshot detected: {}", id, has_snapshots);

        let delete_journal = self.journal.delete_messages_up_to(id, u64::MAX);
        if has_snapshots {
            // Both deletions run concurrently; acknowledgements may arrive
            // in either order, and the first failure wins without waiting
            // for the sibling.
            let delete_snapshots = self.snapshots.delete_matching(id, SnapshotSelectionCriteria::all());
            tokio::try_join!(delete_journal, delete_snapshots)?;
        } else {
            delete_journal.await?;
        }

        Ok(Removals {
            journal_removed: true,
            snapshots_removed: has_snapshots,
        })
    }
}

impl DefaultEraser {
    pub fn new(
        journal: Arc<dyn JournalStore>,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self { journal, snapshots }
    }
}
