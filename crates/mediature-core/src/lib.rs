//! Cross-cutting service plumbing for the Médiature backend: health
//! handlers, identity extraction, serde helpers, tracing setup, and
//! request-id middleware.

pub mod health;
pub mod identity;
pub mod middleware;
pub mod serde;
pub mod tracing;
