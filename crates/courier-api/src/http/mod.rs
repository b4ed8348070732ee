//! HTTP transport: a webhook-style adapter over the relay core.

pub mod handlers;
pub mod router;

pub use router::serve;
