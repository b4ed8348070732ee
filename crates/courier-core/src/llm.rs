//! CompletionClient trait definition.
//!
//! Seam to the external completion service. Implementations live in
//! courier-infra (e.g., `OpenAiCompletionClient`). Uses native async fn
//! in traits (RPITIT, Rust 2024 edition).

use courier_types::error::UpstreamError;
use courier_types::llm::{CompletionRequest, CompletionResponse};
use courier_types::secret::Redacted;

pub trait CompletionClient: Send + Sync {
    /// Send a completion request authenticated with the user's credential.
    ///
    /// Implementations bound the call with a timeout and map elapsed time
    /// to [`UpstreamError::Timeout`].
    fn complete(
        &self,
        request: &CompletionRequest,
        credential: &Redacted,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, UpstreamError>> + Send;

    /// Cheap liveness check for a candidate credential (e.g., listing
    /// models). Used when credential probing is enabled in config.
    fn probe(
        &self,
        credential: &Redacted,
    ) -> impl std::future::Future<Output = Result<(), UpstreamError>> + Send;
}
