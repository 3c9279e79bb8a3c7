//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits for config history and membership.

mod config_history;
mod identity;

pub use config_history::InMemoryConfigHistory;
pub use identity::{serialize_identity, SerializedIdentityDeserializer};
