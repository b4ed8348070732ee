//! Shared domain types for Courier.
//!
//! This crate contains the core domain types used across the Courier relay:
//! user records, session states, chat parameters, LLM request/response
//! shapes, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod params;
pub mod secret;
pub mod user;
