//! Removal of all persisted data for exactly one persistence identifier.

mod default_eraser;
pub use default_eraser::*;

#[cfg(test)]
mod default_eraser_test;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use serde::Serialize;

use crate::PersistenceId;
use crate::Result;

/// Which data categories were present and deleted for one identifier.
///
/// Produced once per eraser run, immutable after creation. `journal_removed`
/// is true whenever the journal deletion was acknowledged, including the
/// no-op deletion of an empty journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removals {
    pub journal_removed: bool,
    pub snapshots_removed: bool,
}

/// Deletes journal history and snapshots for one identifier, reporting
/// success only once every issued deletion has been acknowledged.
///
/// # Safety Requirements
/// Implementations MUST guarantee:
/// 1. Success is never reported for a category whose deletion was issued but
///    not acknowledged
/// 2. The first deletion failure terminates the run without waiting for the
///    sibling deletion
/// 3. No retries; retry policy belongs to the caller
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PersistenceIdEraser: Send + Sync + 'static {
    async fn erase(
        &self,
        id: &PersistenceId,
    ) -> Result<Removals>;
}
