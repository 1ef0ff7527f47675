//! The repair engine core: identifier derivation, single-identifier
//! erasure, batch sequencing, and identifier discovery.

mod discovery;
mod eraser;
mod identifier;
mod sequencer;

pub use discovery::*;
pub use eraser::*;
pub use identifier::*;
pub use sequencer::*;

#[cfg(test)]
mod identifier_test;
