use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::is_blank;
use crate::DefaultEraser;
use crate::EntityDiscovery;
use crate::RepairSequencer;
use crate::RepairSettings;
use crate::Reporter;
use crate::RequestError;
use crate::ResponseStream;
use crate::Result;
use crate::StoreProvider;

/// Arguments of one `delete_sharding_data` invocation.
///
/// Plugin ids are optional; when omitted the engine resolves them from the
/// ambient configuration, sharding-specific override first, general
/// persistence plugin second.
#[derive(Debug, Clone, Default)]
pub struct DeleteRequest {
    pub type_names: Vec<String>,
    pub journal_plugin_id: Option<String>,
    pub snapshot_plugin_id: Option<String>,
}

pub struct RepairEngine {
    settings: RepairSettings,
    stores: Arc<dyn StoreProvider>,
    shutdown: CancellationToken,
}

impl RepairEngine {
    pub fn new(
        settings: RepairSettings,
        stores: Arc<dyn StoreProvider>,
    ) -> Self {
        Self {
            settings,
            stores,
            shutdown: CancellationToken::new(),
        }
    }

    /// Streams every persistence identifier under the sharding namespace.
    ///
    /// Must be called from within a tokio runtime.
    pub fn print_sharding_data(&self) -> Result<ResponseStream> {
        self.spawn_discovery(false)
    }

    /// Streams the region names stored inside the sharding namespace.
    pub fn print_sharding_regions(&self) -> Result<ResponseStream> {
        self.spawn_discovery(true)
    }

    /// Purges journal and snapshot data for the derived identifier of each
    /// distinct type name, serialized and fail-fast.
    ///
    /// Blank type names are rejected before any identifier is derived. An
    /// empty set is not an error: the stream completes with only the final
    /// sentinel.
    pub fn delete_sharding_data(
        &self,
        request: DeleteRequest,
    ) -> Result<ResponseStream> {
        if request.type_names.iter().any(|name| is_blank(name)) {
            return Err(RequestError::BlankTypeName.into());
        }

        let journal_plugin = self
            .settings
            .resolve_journal_plugin(request.journal_plugin_id.as_deref())?;
        let snapshot_plugin = self
            .settings
            .resolve_snapshot_plugin(request.snapshot_plugin_id.as_deref())?;
        info!(
            "delete-sharding-data: {} type name(s), journal plugin [{journal_plugin}], snapshot plugin [{snapshot_plugin}]",
            request.type_names.len()
        );

        let journal = self.stores.journal_store(&journal_plugin)?;
        let snapshots = self.stores.snapshot_store(&snapshot_plugin)?;
        let eraser = Arc::new(DefaultEraser::new(journal, snapshots));

        let (reporter, stream) = Reporter::channel(self.settings.stream.response_buffer);
        let sequencer = RepairSequencer::new(eraser, reporter, self.shutdown.child_token());
        tokio::spawn(sequencer.run(request.type_names));

        Ok(stream)
    }

    /// Aborts every in-flight invocation at its next suspension point.
    /// Deletions already acknowledged by the store are not rolled back.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    fn spawn_discovery(
        &self,
        regions_only: bool,
    ) -> Result<ResponseStream> {
        let query = self.stores.persistence_ids_query()?;
        let (reporter, stream) = Reporter::channel(self.settings.stream.response_buffer);
        let discovery = EntityDiscovery::new(query, reporter, regions_only, self.shutdown.child_token());
        tokio::spawn(discovery.run());
        Ok(stream)
    }
}
