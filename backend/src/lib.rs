//! Backend library modules.
//!
//! The crate follows a hexagonal layout: [`domain`] owns the reading-tracker
//! rules and the ports, [`inbound`] adapts HTTP and WebSocket traffic onto the
//! driving ports, and [`outbound`] implements the driven ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
