//! Core model of the repair engine: the derived persistence identifier.
//!
//! Every shard coordinator persists its state under a string key derived
//! exclusively from the entity type name. The repair engine never invents
//! identifiers, it derives them here or reads them back from the store.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Prefix shared by every identifier under the sharding namespace.
pub const SHARDING_NAMESPACE: &str = "/system/sharding";

/// Marker that distinguishes a shard coordinator from a plain entity id.
const COORDINATOR_MARKER: &str = "Coordinator";

/// Stable string key under which one coordinator's journal and snapshots live.
///
/// Value-typed: equality is string equality. Never persisted by this engine,
/// only derived and matched against what the store reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersistenceId(String);

impl PersistenceId {
    /// Derives the canonical coordinator identifier for an entity type name.
    ///
    /// Pure and total: distinct type names never collapse to the same
    /// identifier, repeated calls yield the same string. Blank names are the
    /// caller's responsibility to reject before derivation.
    pub fn for_type_name(type_name: &str) -> Self {
        Self(format!("{SHARDING_NAMESPACE}/{type_name}{COORDINATOR_MARKER}/singleton/coordinator"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a raw store-reported identifier belongs to the sharding
    /// namespace at all.
    pub fn in_sharding_namespace(raw: &str) -> bool {
        raw.starts_with(SHARDING_NAMESPACE)
    }

    /// Extracts the region (entity type) name embedded in a coordinator
    /// identifier.
    ///
    /// Returns `None` for identifiers that are not coordinators, and for
    /// malformed ones where the coordinator marker precedes the namespace
    /// prefix.
    pub fn region_name(raw: &str) -> Option<&str> {
        let stub = "/system/sharding/";
        let start = raw.find(stub)? + stub.len();
        let end = raw.find(COORDINATOR_MARKER)?;
        if end < start {
            return None;
        }
        Some(&raw[start..end])
    }
}

impl fmt::Display for PersistenceId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}
