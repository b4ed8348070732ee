//! The turn engine: one inbound message in, one serialized turn out.

pub mod service;

pub use service::RelayService;
