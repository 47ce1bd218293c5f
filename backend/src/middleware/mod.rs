//! Actix middleware shared by every route.
//!
//! [`Trace`] tags each request with a trace id for log and error correlation.

pub mod trace;

pub use trace::Trace;
