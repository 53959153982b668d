//! Cross-service plumbing for Warden services: error envelopes, tracing
//! setup, request ids and health probes.

pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
