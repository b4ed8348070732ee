//! Upstream completion clients.

pub mod openai;

pub use openai::OpenAiCompletionClient;
