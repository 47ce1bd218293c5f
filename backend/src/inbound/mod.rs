//! Driving adapters: the `/api/v1` REST surface in [`http`] and the live
//! shelf feed in [`ws`]. Both resolve a `Caller` from the session cookie and
//! hand it to the domain ports.

pub mod http;
pub mod ws;
