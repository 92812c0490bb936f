//! services/api/src/adapters/mod.rs
//!
//! Concrete implementations of the core ports: the document store and the
//! generative assistant.

pub mod assistant;
pub mod store;
