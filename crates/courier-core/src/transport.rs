//! Transport trait definition.
//!
//! The chat transport itself (Telegram-style polling, webhooks, a local
//! console) is outside the core; the core only ever calls back through
//! this seam to deliver outbound text. Multiple sends per inbound message
//! are permitted.

use courier_types::error::TransportError;
use courier_types::user::UserId;

pub trait Transport: Send + Sync {
    fn send(
        &self,
        user_id: &UserId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;
}
