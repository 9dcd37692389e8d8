//! Multi-turn dialogue state machine for pipeline onboarding
//!
//! One [`DialogueSession`] per conversation, owned by its caller and mutated
//! strictly one turn at a time. Each utterance merges freshly extracted slots
//! into the session and recomputes the missing-field list; once nothing is
//! missing the session waits for an explicit yes/no. A session reaching
//! `Confirmed` hands out exactly one [`TurnOutcome::Confirmed`], which is the
//! caller's cue to publish - repeats are reported as `AlreadyConfirmed` so
//! publishing can never run twice for one session.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::extract::extract;
use crate::models::{ParameterSet, SlotField};

/// Where a session currently sits in the onboarding flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    /// Fresh session, nothing collected yet.
    AwaitingInput,
    /// Some slots collected, required ones still missing.
    Collecting,
    /// All required slots present, waiting for an explicit yes/no.
    AwaitingConfirmation,
    /// Operator confirmed; the configuration is being (or has been) published.
    Confirmed,
    /// Operator declined; no artifact is produced.
    Declined,
    /// Publication failed after confirmation. Distinct from `Declined`: the
    /// collected slots are kept so a retry needs no re-entry.
    PublishFailed,
}

impl DialogueState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DialogueState::Confirmed | DialogueState::Declined | DialogueState::PublishFailed
        )
    }
}

/// Input signal for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Utterance(String),
    Confirm,
    Decline,
    Reset,
}

/// What the caller should do after a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Required slots still missing, in reporting order. Keep collecting.
    Collecting { missing: Vec<SlotField> },
    /// All required slots present; ask the operator to confirm.
    ReadyToConfirm,
    /// First affirmative: validate, render and publish now.
    Confirmed,
    /// The session was already confirmed; publish must not run again.
    AlreadyConfirmed,
    /// Operator declined; nothing will be published.
    Declined,
    /// The answer was not a clear yes/no; ask again.
    Reprompt,
    /// Session wiped back to a fresh `AwaitingInput`.
    WasReset,
}

const AFFIRMATIVE: [&str; 8] = ["yes", "y", "yeah", "confirm", "confirmed", "ok", "okay", "proceed"];
const NEGATIVE: [&str; 6] = ["no", "n", "nope", "cancel", "abort", "decline"];

/// Interpret a free-text confirmation answer. `None` means unclear.
fn classify_answer(text: &str) -> Option<bool> {
    let token = text
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase();
    if AFFIRMATIVE.contains(&token.as_str()) {
        Some(true)
    } else if NEGATIVE.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// One onboarding conversation's mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueSession {
    id: Uuid,
    state: DialogueState,
    parameters: ParameterSet,
}

impl DialogueSession {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            state: DialogueState::AwaitingInput,
            parameters: ParameterSet::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn missing_fields(&self) -> Vec<SlotField> {
        self.parameters.missing_fields()
    }

    /// Process one turn.
    pub fn apply(&mut self, signal: Signal) -> TurnOutcome {
        match signal {
            Signal::Reset => self.reset(),
            Signal::Utterance(text) => self.on_utterance(&text),
            Signal::Confirm => self.on_confirm(),
            Signal::Decline => self.on_decline(),
        }
    }

    /// Fill one slot directly, e.g. from a catalog selection, and recompute
    /// the session the same way an utterance would.
    pub fn set_field(&mut self, field: SlotField, value: impl Into<String>) -> TurnOutcome {
        match self.state {
            DialogueState::AwaitingInput | DialogueState::Collecting | DialogueState::AwaitingConfirmation => {
                self.parameters.set(field, value);
                self.recompute()
            }
            _ => self.terminal_outcome(),
        }
    }

    /// Reopen slot collection after validation rejected the parameters,
    /// so the operator can correct fields instead of starting over.
    pub fn reopen(&mut self) {
        info!(session = %self.id, "reopening session for correction");
        self.state = DialogueState::Collecting;
    }

    /// Record that publication failed for this confirmed session. A later
    /// affirmative retries publication without re-entering data.
    pub fn mark_publish_failed(&mut self) {
        if self.state == DialogueState::Confirmed {
            info!(session = %self.id, "publication failed, session kept for retry");
            self.state = DialogueState::PublishFailed;
        }
    }

    fn reset(&mut self) -> TurnOutcome {
        info!(session = %self.id, "session reset");
        self.parameters = ParameterSet::new();
        self.state = DialogueState::AwaitingInput;
        TurnOutcome::WasReset
    }

    fn on_utterance(&mut self, text: &str) -> TurnOutcome {
        match self.state {
            DialogueState::AwaitingInput | DialogueState::Collecting => {
                let extracted = extract(text);
                self.parameters.merge(&extracted);
                self.recompute()
            }
            DialogueState::AwaitingConfirmation | DialogueState::PublishFailed => {
                match classify_answer(text) {
                    Some(true) => self.on_confirm(),
                    Some(false) => self.on_decline(),
                    None => TurnOutcome::Reprompt,
                }
            }
            DialogueState::Confirmed | DialogueState::Declined => self.terminal_outcome(),
        }
    }

    fn on_confirm(&mut self) -> TurnOutcome {
        match self.state {
            DialogueState::AwaitingConfirmation => {
                info!(session = %self.id, "configuration confirmed");
                self.state = DialogueState::Confirmed;
                TurnOutcome::Confirmed
            }
            // Retry path: the previous publish attempt failed, the data is
            // intact, and publishing is idempotent per artifact id.
            DialogueState::PublishFailed => {
                info!(session = %self.id, "retrying publication");
                self.state = DialogueState::Confirmed;
                TurnOutcome::Confirmed
            }
            DialogueState::Confirmed => TurnOutcome::AlreadyConfirmed,
            DialogueState::Declined => TurnOutcome::Declined,
            // Confirming an incomplete session just re-surfaces what is missing.
            DialogueState::AwaitingInput | DialogueState::Collecting => self.recompute(),
        }
    }

    fn on_decline(&mut self) -> TurnOutcome {
        match self.state {
            DialogueState::AwaitingConfirmation | DialogueState::PublishFailed => {
                info!(session = %self.id, "configuration declined");
                self.state = DialogueState::Declined;
                TurnOutcome::Declined
            }
            DialogueState::Declined => TurnOutcome::Declined,
            DialogueState::Confirmed => TurnOutcome::AlreadyConfirmed,
            DialogueState::AwaitingInput | DialogueState::Collecting => TurnOutcome::Reprompt,
        }
    }

    fn recompute(&mut self) -> TurnOutcome {
        let missing = self.parameters.missing_fields();
        if missing.is_empty() {
            debug!(session = %self.id, "all required slots present");
            self.state = DialogueState::AwaitingConfirmation;
            TurnOutcome::ReadyToConfirm
        } else {
            debug!(session = %self.id, missing = ?missing, "slots still missing");
            self.state = DialogueState::Collecting;
            TurnOutcome::Collecting { missing }
        }
    }

    fn terminal_outcome(&self) -> TurnOutcome {
        match self.state {
            DialogueState::Confirmed => TurnOutcome::AlreadyConfirmed,
            DialogueState::Declined => TurnOutcome::Declined,
            _ => TurnOutcome::Reprompt,
        }
    }
}

impl Default for DialogueSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_prompt_goes_straight_to_confirmation() {
        let mut session = DialogueSession::new();
        let outcome = session.apply(Signal::Utterance(
            "Ingest transactions data from MySQL to Postgres daily, incremental".to_string(),
        ));
        assert_eq!(outcome, TurnOutcome::ReadyToConfirm);
        assert_eq!(session.state(), DialogueState::AwaitingConfirmation);
    }

    #[test]
    fn test_partial_prompt_collects_missing_fields() {
        let mut session = DialogueSession::new();
        let outcome = session.apply(Signal::Utterance("onboard the sales data".to_string()));
        assert_eq!(
            outcome,
            TurnOutcome::Collecting {
                missing: vec![SlotField::SourceName, SlotField::Refresh, SlotField::LoadStrategy],
            }
        );
        assert_eq!(session.state(), DialogueState::Collecting);
    }

    #[test]
    fn test_slots_accumulate_across_turns() {
        let mut session = DialogueSession::new();
        session.apply(Signal::Utterance("onboard the sales data".to_string()));
        session.apply(Signal::Utterance("from mysql please".to_string()));
        let outcome = session.apply(Signal::Utterance("monthly, full load".to_string()));
        assert_eq!(outcome, TurnOutcome::ReadyToConfirm);
    }

    #[test]
    fn test_confirm_is_idempotent() {
        let mut session = DialogueSession::new();
        session.apply(Signal::Utterance(
            "ingest transactions from mysql daily incremental".to_string(),
        ));
        assert_eq!(session.apply(Signal::Confirm), TurnOutcome::Confirmed);
        assert_eq!(session.apply(Signal::Confirm), TurnOutcome::AlreadyConfirmed);
        assert_eq!(session.apply(Signal::Confirm), TurnOutcome::AlreadyConfirmed);
    }

    #[test]
    fn test_textual_confirmation_answers() {
        let mut session = DialogueSession::new();
        session.apply(Signal::Utterance(
            "ingest transactions from mysql daily incremental".to_string(),
        ));
        assert_eq!(
            session.apply(Signal::Utterance("hmm, what about costs?".to_string())),
            TurnOutcome::Reprompt
        );
        assert_eq!(
            session.apply(Signal::Utterance("yes, go ahead".to_string())),
            TurnOutcome::Confirmed
        );
    }

    #[test]
    fn test_decline_is_terminal() {
        let mut session = DialogueSession::new();
        session.apply(Signal::Utterance(
            "ingest transactions from mysql daily incremental".to_string(),
        ));
        assert_eq!(session.apply(Signal::Decline), TurnOutcome::Declined);
        assert_eq!(session.state(), DialogueState::Declined);
        assert_eq!(
            session.apply(Signal::Utterance("actually yes".to_string())),
            TurnOutcome::Declined
        );
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut session = DialogueSession::new();
        session.apply(Signal::Utterance(
            "ingest transactions from mysql daily incremental".to_string(),
        ));
        session.apply(Signal::Confirm);
        assert_eq!(session.apply(Signal::Reset), TurnOutcome::WasReset);
        assert_eq!(session.state(), DialogueState::AwaitingInput);
        assert!(session.parameters().missing_fields().len() == SlotField::REQUIRED.len());
    }

    #[test]
    fn test_failed_publish_allows_retry() {
        let mut session = DialogueSession::new();
        session.apply(Signal::Utterance(
            "ingest transactions from mysql daily incremental".to_string(),
        ));
        assert_eq!(session.apply(Signal::Confirm), TurnOutcome::Confirmed);
        session.mark_publish_failed();
        assert_eq!(session.state(), DialogueState::PublishFailed);
        // Retry hands out Confirmed again - the publish never happened.
        assert_eq!(session.apply(Signal::Confirm), TurnOutcome::Confirmed);
    }

    #[test]
    fn test_confirm_while_incomplete_resurfaces_missing() {
        let mut session = DialogueSession::new();
        session.apply(Signal::Utterance("onboard the sales data".to_string()));
        let outcome = session.apply(Signal::Confirm);
        assert!(matches!(outcome, TurnOutcome::Collecting { .. }));
        assert_eq!(session.state(), DialogueState::Collecting);
    }

    #[test]
    fn test_set_field_can_complete_a_session() {
        let mut session = DialogueSession::new();
        session.apply(Signal::Utterance("onboard the sales data".to_string()));
        session.set_field(SlotField::SourceName, "postgres_sales");
        session.set_field(SlotField::Refresh, "every fortnight");
        let outcome = session.set_field(SlotField::LoadStrategy, "incremental");
        assert_eq!(outcome, TurnOutcome::ReadyToConfirm);
    }

    #[test]
    fn test_classify_answer() {
        assert_eq!(classify_answer("yes"), Some(true));
        assert_eq!(classify_answer("Yes, please!"), Some(true));
        assert_eq!(classify_answer("ok."), Some(true));
        assert_eq!(classify_answer("no"), Some(false));
        assert_eq!(classify_answer("Nope"), Some(false));
        assert_eq!(classify_answer("maybe later"), None);
        assert_eq!(classify_answer(""), None);
    }
}
