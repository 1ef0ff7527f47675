//! Repair Engine Error Hierarchy
//!
//! Defines error types for the sharding repair engine, categorized by
//! backing-store failures, caller request problems, and configuration issues.

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Backing-store delete/query failures
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration loading and validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Malformed caller requests
    #[error(transparent)]
    Request(#[from] RequestError),

    /// A worker vanished without reporting a result
    #[error("Illegal state: {0}")]
    IllegalState(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Journal deletion rejected or failed by the backing store
    #[error("journal deletion failed: {0}")]
    Journal(String),

    /// Snapshot probe or deletion rejected or failed by the backing store
    #[error("snapshot store operation failed: {0}")]
    Snapshot(String),

    /// The persistence-id enumeration source failed mid-stream
    #[error("persistence id query failed: {0}")]
    Query(String),

    /// Plugin id does not map to any registered backing store
    #[error("no backing store registered for plugin id [{0}]")]
    UnknownPlugin(String),

    /// Low-level storage engine I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Entity type names must be rejected before identifier derivation
    #[error("type names must not be blank")]
    BlankTypeName,

    /// No journal plugin resolvable from arguments or configuration
    #[error("no journal plugin id configured; pass one explicitly or set persistence.journal_plugin")]
    NoJournalPlugin,

    /// No snapshot plugin resolvable from arguments or configuration
    #[error("no snapshot plugin id configured; pass one explicitly or set persistence.snapshot_plugin")]
    NoSnapshotPlugin,
}
