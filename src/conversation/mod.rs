//! Conversation orchestration: sessions, replies, and the publish flow
//!
//! A [`ConversationManager`] owns every active onboarding session, keyed by
//! id. Sessions are explicit objects - nothing here lives in ambient process
//! state - and each one is driven strictly one message at a time. The manager
//! wires the deterministic core (extraction, dialogue, validation, rendering)
//! to the collaborators that may actually fail: the publish gateway and the
//! chat completion service.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dialogue::{DialogueSession, DialogueState, Signal, TurnOutcome};
use crate::llm::{ChatClient, ChatMessage};
use crate::models::{ParameterSet, SlotField};
use crate::publish::{PublishGateway, VcsHost};
use crate::render::{RenderError, render};
use crate::validation::{DEFAULT_SOURCE_SCHEMA, DEFAULT_TARGET_SCHEMA, build_config};

/// Reply handed back to the front-end after one operator message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationReply {
    /// Required slots still missing, in reporting order.
    NeedMoreInput { missing: Vec<SlotField> },
    /// Everything collected; show the summary and ask for a yes/no.
    ConfirmationRequested { summary: String },
    /// Pull request opened, or found again from an earlier attempt.
    Published { dag_id: String, url: String, already_existed: bool },
    /// Publication failed; the session is kept so a retry needs no re-entry.
    PublishFailed { message: String, retryable: bool },
    /// Validation rejected the collected slots; collection is reopened.
    InvalidConfiguration { message: String },
    /// Operator declined; nothing was published.
    Declined,
    /// Session wiped back to a fresh start.
    SessionReset,
}

/// Errors surfaced by the conversation layer itself.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("unknown session: {0}")]
    UnknownSession(Uuid),
    #[error(transparent)]
    Render(#[from] RenderError),
}

struct PublishRecord {
    dag_id: String,
    url: String,
}

struct SessionEntry {
    dialogue: DialogueSession,
    transcript: Vec<ChatMessage>,
    published: Option<PublishRecord>,
}

/// Owns all active onboarding conversations.
pub struct ConversationManager<H: VcsHost> {
    gateway: PublishGateway<H>,
    chat: Option<Arc<dyn ChatClient>>,
    sessions: HashMap<Uuid, SessionEntry>,
}

impl<H: VcsHost> ConversationManager<H> {
    pub fn new(gateway: PublishGateway<H>) -> Self {
        Self {
            gateway,
            chat: None,
            sessions: HashMap::new(),
        }
    }

    /// Attach a chat client for open-ended analytics questions.
    pub fn with_chat_client(mut self, chat: Arc<dyn ChatClient>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Start a new, empty session and return its id.
    pub fn start_session(&mut self) -> Uuid {
        let dialogue = DialogueSession::new();
        let id = dialogue.id();
        info!(session = %id, "starting onboarding session");
        self.sessions.insert(
            id,
            SessionEntry {
                dialogue,
                transcript: Vec::new(),
                published: None,
            },
        );
        id
    }

    pub fn session_state(&self, id: Uuid) -> Option<DialogueState> {
        self.sessions.get(&id).map(|entry| entry.dialogue.state())
    }

    pub fn missing_fields(&self, id: Uuid) -> Option<Vec<SlotField>> {
        self.sessions.get(&id).map(|entry| entry.dialogue.missing_fields())
    }

    /// Per-session chat transcript (analytics Q&A only).
    pub fn transcript(&self, id: Uuid) -> Option<&[ChatMessage]> {
        self.sessions.get(&id).map(|entry| entry.transcript.as_slice())
    }

    /// Process one onboarding message.
    pub async fn handle_message(
        &mut self,
        id: Uuid,
        text: &str,
    ) -> Result<ConversationReply, ConversationError> {
        let outcome = self.entry_mut(id)?.dialogue.apply(Signal::Utterance(text.to_string()));
        self.resolve(id, outcome).await
    }

    /// Explicit confirmation, e.g. from a front-end button.
    pub async fn confirm(&mut self, id: Uuid) -> Result<ConversationReply, ConversationError> {
        let outcome = self.entry_mut(id)?.dialogue.apply(Signal::Confirm);
        self.resolve(id, outcome).await
    }

    /// Explicit decline.
    pub async fn decline(&mut self, id: Uuid) -> Result<ConversationReply, ConversationError> {
        let outcome = self.entry_mut(id)?.dialogue.apply(Signal::Decline);
        self.resolve(id, outcome).await
    }

    /// Fill one slot directly, e.g. from a catalog selection.
    pub async fn set_field(
        &mut self,
        id: Uuid,
        field: SlotField,
        value: &str,
    ) -> Result<ConversationReply, ConversationError> {
        let outcome = self.entry_mut(id)?.dialogue.set_field(field, value);
        self.resolve(id, outcome).await
    }

    /// Wipe a session back to a fresh start.
    pub fn reset_session(&mut self, id: Uuid) -> Result<ConversationReply, ConversationError> {
        let entry = self.entry_mut(id)?;
        entry.dialogue.apply(Signal::Reset);
        entry.transcript.clear();
        entry.published = None;
        Ok(ConversationReply::SessionReset)
    }

    /// Drop a finished session entirely.
    pub fn remove_session(&mut self, id: Uuid) -> Option<DialogueState> {
        self.sessions.remove(&id).map(|entry| entry.dialogue.state())
    }

    /// Open-ended analytics question, answered by the chat collaborator.
    /// Completion failures degrade to an apologetic reply - they never abort
    /// the onboarding flow.
    pub async fn ask_analyst(&mut self, id: Uuid, question: &str) -> Result<String, ConversationError> {
        let Some(chat) = self.chat.clone() else {
            return Ok("The analytics assistant is not configured.".to_string());
        };

        self.entry_mut(id)?.transcript.push(ChatMessage::user(question));
        let transcript = self.entry(id)?.transcript.clone();

        match chat.chat(&transcript).await {
            Ok(reply) => {
                self.entry_mut(id)?.transcript.push(ChatMessage::assistant(&reply));
                Ok(reply)
            }
            Err(err) => {
                warn!(session = %id, error = %err, "chat completion failed");
                Ok(format!(
                    "The analytics assistant is unavailable right now ({err}). \
                     Pipeline configuration still works."
                ))
            }
        }
    }

    async fn resolve(
        &mut self,
        id: Uuid,
        outcome: TurnOutcome,
    ) -> Result<ConversationReply, ConversationError> {
        match outcome {
            TurnOutcome::Collecting { missing } => Ok(ConversationReply::NeedMoreInput { missing }),
            TurnOutcome::ReadyToConfirm | TurnOutcome::Reprompt => {
                let summary = summarize(self.entry(id)?.dialogue.parameters());
                Ok(ConversationReply::ConfirmationRequested { summary })
            }
            TurnOutcome::Confirmed => self.publish_confirmed(id).await,
            TurnOutcome::AlreadyConfirmed => {
                let record = self
                    .entry(id)?
                    .published
                    .as_ref()
                    .map(|r| (r.dag_id.clone(), r.url.clone()));
                match record {
                    Some((dag_id, url)) => Ok(ConversationReply::Published {
                        dag_id,
                        url,
                        already_existed: true,
                    }),
                    // Confirmed but never recorded: publish again, it is idempotent.
                    None => self.publish_confirmed(id).await,
                }
            }
            TurnOutcome::Declined => Ok(ConversationReply::Declined),
            TurnOutcome::WasReset => Ok(ConversationReply::SessionReset),
        }
    }

    async fn publish_confirmed(&mut self, id: Uuid) -> Result<ConversationReply, ConversationError> {
        let params = self.entry(id)?.dialogue.parameters().clone();

        let config = match build_config(&params) {
            Ok(config) => config,
            Err(err) => {
                warn!(session = %id, error = %err, "validation rejected confirmed parameters");
                self.entry_mut(id)?.dialogue.reopen();
                return Ok(ConversationReply::InvalidConfiguration { message: err.to_string() });
            }
        };

        let artifact = render(&config)?;
        let branch = artifact.dag_id.clone();

        match self
            .gateway
            .publish(&artifact.dag_id, &artifact.config_document, &branch)
            .await
        {
            Ok(outcome) => {
                info!(session = %id, dag_id = %artifact.dag_id, pr = %outcome.location.url, "configuration published");
                let entry = self.entry_mut(id)?;
                entry.published = Some(PublishRecord {
                    dag_id: artifact.dag_id.clone(),
                    url: outcome.location.url.clone(),
                });
                Ok(ConversationReply::Published {
                    dag_id: artifact.dag_id,
                    url: outcome.location.url,
                    already_existed: !outcome.created,
                })
            }
            Err(err) => {
                warn!(session = %id, error = %err, "publication failed");
                self.entry_mut(id)?.dialogue.mark_publish_failed();
                Ok(ConversationReply::PublishFailed {
                    message: err.user_message(),
                    retryable: err.is_retryable(),
                })
            }
        }
    }

    fn entry(&self, id: Uuid) -> Result<&SessionEntry, ConversationError> {
        self.sessions.get(&id).ok_or(ConversationError::UnknownSession(id))
    }

    fn entry_mut(&mut self, id: Uuid) -> Result<&mut SessionEntry, ConversationError> {
        self.sessions.get_mut(&id).ok_or(ConversationError::UnknownSession(id))
    }
}

/// Confirmation summary for the operator. Total over partial sets: unset
/// slots show as `(unset)`, schemas fall back to the catalog defaults the
/// validator would apply.
fn summarize(params: &ParameterSet) -> String {
    let get = |field: SlotField| params.get(field).unwrap_or("(unset)");
    format!(
        "source: {}.{}.{} -> target: {}.{} | domain: {} | refresh: {} | load: {}",
        get(SlotField::SourceName),
        params.get(SlotField::SourceSchema).unwrap_or(DEFAULT_SOURCE_SCHEMA),
        get(SlotField::SourceTable),
        params.get(SlotField::TargetSchema).unwrap_or(DEFAULT_TARGET_SCHEMA),
        get(SlotField::TargetTable),
        get(SlotField::Domain),
        get(SlotField::Refresh),
        get(SlotField::LoadStrategy),
    )
}
