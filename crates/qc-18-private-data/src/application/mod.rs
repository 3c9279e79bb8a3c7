//! Application layer: collection views and the store service.

pub mod collection;
pub mod service;

pub use collection::SimpleCollection;
pub use service::SimpleCollectionStore;
