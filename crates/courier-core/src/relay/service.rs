//! RelayService: executes one exclusive turn per inbound message.
//!
//! Generic over the repository, completion client, and transport seams so
//! courier-core never depends on courier-infra. The service owns the
//! per-user dispatcher; everything inside a turn sees a consistent record
//! image, and nothing outside a turn can touch it.
//!
//! Failure policy (one user-visible message per failure, nothing
//! swallowed): upstream errors leave history unmutated; storage errors
//! discard the in-memory mutation and ask the user to retry; transport
//! send failures after commit are logged and non-fatal.

use chrono::Utc;
use tracing::{debug, error, info, warn};

use courier_types::config::CourierConfig;
use courier_types::error::ValidationError;
use courier_types::llm::CompletionRequest;
use courier_types::params::ChatParams;
use courier_types::secret::Redacted;
use courier_types::user::{Language, MessageRole, SessionState, UserRecord};

use crate::catalog;
use crate::context::ContextWindow;
use crate::dispatch::TurnGate;
use crate::llm::CompletionClient;
use crate::repository::UserRepository;
use crate::session::{self, Inbound, Step};
use crate::transport::Transport;

pub struct RelayService<R, C> {
    repo: R,
    client: C,
    gate: TurnGate,
    window: ContextWindow,
    config: CourierConfig,
}

impl<R: UserRepository, C: CompletionClient> RelayService<R, C> {
    pub fn new(repo: R, client: C, config: CourierConfig) -> Self {
        let window = ContextWindow::new(config.context_turns, config.history_cap);
        Self {
            repo,
            client,
            gate: TurnGate::new(),
            window,
            config,
        }
    }

    /// Process one inbound message as an exclusive turn for its user and
    /// deliver the resulting replies.
    ///
    /// Turns for the same user run in arrival order and never overlap;
    /// turns for distinct users proceed in parallel.
    pub async fn handle<T: Transport>(&self, transport: &T, inbound: Inbound) {
        let _guard = self.gate.turn(&inbound.user_id).await;

        let replies = self.run_turn(&inbound).await;
        for text in replies {
            if let Err(err) = transport.send(&inbound.user_id, &text).await {
                // The turn is already committed; an undeliverable reply is
                // logged, never rolled back.
                warn!(user_id = %inbound.user_id, error = %err, "outbound send failed");
            }
        }
    }

    async fn run_turn(&self, inbound: &Inbound) -> Vec<String> {
        let mut record = match self.repo.load_or_create(&inbound.user_id).await {
            Ok(record) => record,
            Err(err) => {
                error!(user_id = %inbound.user_id, error = %err, "failed to load user record");
                return vec![catalog::storage_failed(Language::default()).to_string()];
            }
        };
        let lang = record.language;
        let was_pending = record.state != SessionState::Idle;
        let step = session::step(&record, inbound);
        debug!(user_id = %inbound.user_id, state = %record.state, step = step.label(), "turn step");

        match step {
            Step::Help => vec![catalog::help(lang).to_string()],
            Step::UnknownCommand => vec![catalog::unknown_command(lang).to_string()],

            Step::Greet => {
                if record.has_credential() {
                    vec![catalog::welcome(lang).to_string()]
                } else {
                    record.state = SessionState::AwaitingCredential;
                    self.commit(
                        record,
                        vec![
                            catalog::welcome(lang).to_string(),
                            catalog::credential_prompt(lang).to_string(),
                        ],
                        lang,
                    )
                    .await
                }
            }

            Step::PromptCredential => {
                record.state = SessionState::AwaitingCredential;
                self.commit(record, vec![catalog::credential_prompt(lang).to_string()], lang)
                    .await
            }

            Step::AcceptCredential(text) => self.accept_credential(record, &text, lang).await,

            Step::ResetHistory => {
                record.state = SessionState::Idle;
                record.history.clear();
                self.commit(record, vec![catalog::chat_reset(lang).to_string()], lang)
                    .await
            }

            Step::ShowParams => {
                record.state = SessionState::Idle;
                let reply = catalog::params_current(lang, &record.params.render());
                if was_pending {
                    self.commit(record, vec![reply], lang).await
                } else {
                    vec![reply]
                }
            }

            Step::EditParam { name, value } | Step::AcceptParamValue { name, value } => {
                record.state = SessionState::Idle;
                match record.params.set(&name, &value) {
                    Ok(()) => {
                        info!(user_id = %record.user_id, param = %name, "parameter updated");
                        let reply = catalog::params_set(lang, &name, &value);
                        self.commit(record, vec![reply], lang).await
                    }
                    Err(err) => {
                        let reply = catalog::params_invalid(lang, &err);
                        if was_pending {
                            // Persist the reversion out of the pending flow
                            // even though the value was rejected.
                            self.commit(record, vec![reply], lang).await
                        } else {
                            vec![reply]
                        }
                    }
                }
            }

            Step::PromptParamValue { name } => {
                if !ChatParams::is_recognized(&name) {
                    record.state = SessionState::Idle;
                    let err = ValidationError::UnknownParam(name);
                    let reply = format!(
                        "{}\n{}",
                        catalog::params_invalid(lang, &err),
                        catalog::params_usage(lang)
                    );
                    if was_pending {
                        self.commit(record, vec![reply], lang).await
                    } else {
                        vec![reply]
                    }
                } else {
                    let reply = catalog::param_value_prompt(lang, &name);
                    record.state = SessionState::AwaitingParamValue { name };
                    self.commit(record, vec![reply], lang).await
                }
            }

            Step::PromptLanguage => {
                record.state = SessionState::AwaitingLanguage;
                self.commit(record, vec![catalog::language_prompt(lang)], lang)
                    .await
            }

            Step::SelectLanguage(text) => match text.parse::<Language>() {
                Ok(selected) => {
                    record.language = selected;
                    record.state = SessionState::Idle;
                    info!(user_id = %record.user_id, language = %selected, "language updated");
                    // Confirm in the language just picked.
                    self.commit(record, vec![catalog::language_set(selected)], selected)
                        .await
                }
                // Invalid selection: report and stay in the menu.
                Err(_) => vec![catalog::language_invalid(lang)],
            },

            Step::Chat(text) => self.chat_turn(record, &text, lang).await,
        }
    }

    async fn accept_credential(
        &self,
        mut record: UserRecord,
        text: &str,
        lang: Language,
    ) -> Vec<String> {
        let candidate = text.trim();
        if let Err(err) = session::validate_credential_shape(candidate) {
            // Report and stay in AwaitingCredential for another attempt.
            return vec![catalog::credential_invalid(lang, &err)];
        }

        let credential = Redacted::new(candidate);
        if self.config.probe_credential {
            if let Err(err) = self.client.probe(&credential).await {
                warn!(user_id = %record.user_id, error = %err, "credential probe failed");
                return vec![catalog::credential_rejected(lang).to_string()];
            }
        }

        record.credential = Some(credential);
        record.state = SessionState::Idle;
        info!(user_id = %record.user_id, "credential stored");
        self.commit(record, vec![catalog::credential_saved(lang).to_string()], lang)
            .await
    }

    async fn chat_turn(&self, mut record: UserRecord, text: &str, lang: Language) -> Vec<String> {
        let Some(credential) = record.credential.clone().filter(|c| !c.is_empty()) else {
            return vec![catalog::need_credential(lang).to_string()];
        };

        let prompt = self.window.build_prompt(&record.history, text);
        let request = CompletionRequest::new(&record.params, prompt);

        let response = match self.client.complete(&request, &credential).await {
            Ok(response) => response,
            Err(err) => {
                // Failed turns leave history untouched.
                warn!(user_id = %record.user_id, error = %err, "completion failed");
                return vec![catalog::upstream_failure(lang, &err).to_string()];
            }
        };

        self.window.append(&mut record, MessageRole::User, text);
        self.window
            .append(&mut record, MessageRole::Assistant, response.content.clone());
        self.commit(record, vec![response.content], lang).await
    }

    /// Persist the mutated record; on failure the mutation is discarded
    /// (the next turn reloads the committed image) and the replies are
    /// replaced with the single retry message.
    async fn commit(
        &self,
        mut record: UserRecord,
        replies: Vec<String>,
        lang: Language,
    ) -> Vec<String> {
        record.updated_at = Utc::now();
        match self.repo.save(&record).await {
            Ok(()) => replies,
            Err(err) => {
                error!(user_id = %record.user_id, error = %err, "failed to persist turn");
                vec![catalog::storage_failed(lang).to_string()]
            }
        }
    }
}
