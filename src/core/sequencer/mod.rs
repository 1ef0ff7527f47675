//! Serialized, fail-fast processing of a batch of derived identifiers.

mod repair_sequencer;
pub use repair_sequencer::*;
