//! HTTP transport handlers.
//!
//! POST /v1/messages
//!
//! The calling transport (a webhook bridge, a bot gateway) delivers one
//! inbound message and receives every reply the turn produced, in order.
//! Commands arrive pre-split as `{verb, args}`, matching the transport
//! interface the core expects.

use std::sync::Mutex;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use courier_core::session::Inbound;
use courier_core::transport::Transport;
use courier_types::error::TransportError;
use courier_types::user::UserId;

use crate::state::AppState;

/// Request body for the inbound-message endpoint.
#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    pub user_id: String,
    /// Full message text.
    #[serde(default)]
    pub text: String,
    /// Present when the caller recognized the message as a command.
    #[serde(default)]
    pub command: Option<CommandBody>,
}

/// Pre-split command carried by the transport.
#[derive(Debug, Deserialize)]
pub struct CommandBody {
    pub verb: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Response body: the turn's replies, in send order.
#[derive(Debug, Serialize)]
pub struct TurnReplies {
    pub replies: Vec<String>,
}

/// Transport that buffers this turn's sends for the HTTP response.
#[derive(Default)]
struct ReplyCollector {
    replies: Mutex<Vec<String>>,
}

impl ReplyCollector {
    fn into_replies(self) -> Vec<String> {
        self.replies.into_inner().unwrap_or_default()
    }
}

impl Transport for ReplyCollector {
    async fn send(&self, _user_id: &UserId, text: &str) -> Result<(), TransportError> {
        self.replies
            .lock()
            .map_err(|_| TransportError::Send("reply buffer poisoned".to_string()))?
            .push(text.to_string());
        Ok(())
    }
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}

/// POST /v1/messages -- run one turn and return its replies.
pub async fn post_message(
    State(state): State<AppState>,
    Json(body): Json<InboundMessage>,
) -> Json<TurnReplies> {
    let inbound = match body.command {
        Some(cmd) => Inbound::command(body.user_id.as_str(), cmd.verb, cmd.args),
        None => Inbound::text(body.user_id.as_str(), body.text),
    };

    let collector = ReplyCollector::default();
    state.relay.handle(&collector, inbound).await;

    Json(TurnReplies {
        replies: collector.into_replies(),
    })
}
