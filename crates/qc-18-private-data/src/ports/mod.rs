//! # Ports Module
//!
//! Inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::{Collection, CollectionAccessPolicy, CollectionStore, Filter};
pub use outbound::{ConfigHistory, IdentityDeserializer, MockConfigHistory};
