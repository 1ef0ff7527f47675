//! Enumeration of existing persistence identifiers under the sharding
//! namespace.

use std::sync::Arc;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing::warn;

use crate::PersistenceId;
use crate::PersistenceIdsQuery;
use crate::Reporter;

/// Streams the store's known identifiers to the caller, either verbatim or
/// reduced to the region names embedded in coordinator identifiers.
///
/// A mid-stream source failure terminates the run with the full cause;
/// progress already emitted stays valid.
pub struct EntityDiscovery {
    query: Arc<dyn PersistenceIdsQuery>,
    reporter: Reporter,
    regions_only: bool,
    shutdown: CancellationToken,
}

impl EntityDiscovery {
    pub fn new(
        query: Arc<dyn PersistenceIdsQuery>,
        reporter: Reporter,
        regions_only: bool,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            query,
            reporter,
            regions_only,
            shutdown,
        }
    }

    pub async fn run(self) {
        let mut source = self.query.current_persistence_ids();

        loop {
            let next = tokio::select! {
                // Shutdown takes priority over a ready source item.
                biased;

                _ = self.shutdown.cancelled() => {
                    warn!("shutdown requested, aborting discovery");
                    return;
                }
                next = source.next() => next,
            };

            match next {
                Some(Ok(raw)) => {
                    if !PersistenceId::in_sharding_namespace(&raw) {
                        continue;
                    }
                    let line = if self.regions_only {
                        // Non-coordinator identifiers carry no region name
                        // and are silently dropped in this mode.
                        match PersistenceId::region_name(&raw) {
                            Some(region) => region.to_string(),
                            None => continue,
                        }
                    } else {
                        raw
                    };
                    if self.reporter.progress(line).await.is_err() {
                        warn!("response consumer withdrew, aborting discovery");
                        return;
                    }
                }
                Some(Err(cause)) => {
                    error!("persistence id enumeration failed: [{cause}]");
                    let _ = self.reporter.errored(cause.to_string()).await;
                    return;
                }
                None => break,
            }
        }

        let _ = self.reporter.done().await;
    }
}
