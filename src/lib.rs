mod config;
mod core;
mod engine;
mod errors;
mod protocol;
mod store;

pub use self::config::*;
pub use self::core::*;
pub use self::engine::*;
pub use self::errors::*;
pub use self::protocol::*;
pub use self::store::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
