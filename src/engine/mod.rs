//! Caller-facing surface of the repair engine.
//!
//! Three operations, each running as an isolated task streaming ordered
//! responses back to the caller:
//! - `print_sharding_data`: raw persistence identifiers under the sharding
//!   namespace
//! - `print_sharding_regions`: region names extracted from coordinator
//!   identifiers
//! - `delete_sharding_data`: serialized fail-fast purge of the derived
//!   identifiers for a set of entity type names

mod repair_engine;
pub use repair_engine::*;
