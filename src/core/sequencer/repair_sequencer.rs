use std::collections::VecDeque;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::Error;
use crate::PersistenceId;
use crate::PersistenceIdEraser;
use crate::Reporter;

/// Drives one repair batch to completion, strictly one eraser at a time.
///
/// Per identifier the sequencer emits a "removing"/"removed" progress pair;
/// the first failure aborts the remaining batch and the error is the
/// terminal message. An empty batch completes with only the final sentinel.
pub struct RepairSequencer {
    eraser: Arc<dyn PersistenceIdEraser>,
    reporter: Reporter,
    shutdown: CancellationToken,
}

impl RepairSequencer {
    pub fn new(
        eraser: Arc<dyn PersistenceIdEraser>,
        reporter: Reporter,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            eraser,
            reporter,
            shutdown,
        }
    }

    /// Derives one identifier per distinct type name, first-seen order.
    pub(crate) fn build_batch(type_names: &[String]) -> VecDeque<PersistenceId> {
        let mut batch = VecDeque::with_capacity(type_names.len());
        for name in type_names {
            let id = PersistenceId::for_type_name(name);
            if !batch.contains(&id) {
                batch.push_back(id);
            }
        }
        batch
    }

    /// Processes the batch until it drains, the consumer withdraws, the
    /// shutdown token fires, or the first failure.
    pub async fn run(
        self,
        type_names: Vec<String>,
    ) {
        let mut remaining = Self::build_batch(&type_names);

        while let Some(current) = remaining.pop_front() {
            // Consult the token before announcing or issuing any further
            // store operation.
            if self.shutdown.is_cancelled() {
                warn!("shutdown requested, aborting repair batch");
                return;
            }

            let msg = format!("Removing data for persistenceId [{current}]");
            info!("{msg}");
            if self.reporter.progress(msg).await.is_err() {
                warn!("response consumer withdrew, aborting repair batch");
                return;
            }

            // One transient worker per identifier. The join handle doubles
            // as the liveness watch: a panic inside the worker surfaces
            // here as a join error instead of leaving the batch hanging.
            let eraser = self.eraser.clone();
            let id = current.clone();
            let mut worker = tokio::spawn(async move { eraser.erase(&id).await });

            let outcome = tokio::select! {
                // Shutdown takes priority over a ready worker result.
                biased;

                _ = self.shutdown.cancelled() => {
                    warn!("shutdown requested, aborting repair batch");
                    worker.abort();
                    return;
                }
                outcome = &mut worker => outcome,
            };

            match outcome {
                Ok(Ok(removals)) => {
                    let msg = format!("Removed data for persistenceId [{current}]");
                    info!(
                        "{msg} (journal: {}, snapshots: {})",
                        removals.journal_removed, removals.snapshots_removed
                    );
                    if self.reporter.progress(msg).await.is_err() {
                        warn!("response consumer withdrew, aborting repair batch");
                        return;
                    }
                }
                Ok(Err(cause)) => {
                    let msg =
                        format!("Failed to remove data for persistenceId [{current}]. Exception: [{cause}]");
                    error!("{msg}");
                    let _ = self.reporter.errored(msg).await;
                    return;
                }
                Err(join_error) => {
                    // The worker vanished without reporting a result.
                    let cause = Error::IllegalState(format!(
                        "Failed to remove data for persistenceId [{current}], unexpected termination."
                    ));
                    error!("{cause} join error: [{join_error}]");
                    let _ = self.reporter.errored(cause.to_string()).await;
                    return;
                }
            }
        }

        let _ = self.reporter.done().await;
    }
}
