//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local document stores with live observation
//! - **catalog**: reqwest client for the public volumes API
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod catalog;
pub mod memory;
