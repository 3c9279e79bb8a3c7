//! # Domain Module
//!
//! Core domain types for the Private Data Collections subsystem.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod key;
pub mod policy;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use key::*;
pub use policy::*;
pub use value_objects::*;
