// Assistant proxy - Forwards chat questions and keeps the transcript consistent
use crate::application::telemetry_client::ClientError;
use crate::domain::chat::{AssistantAnswer, ChatTurn, Transcript};
use crate::domain::session::ActiveSession;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const FALLBACK_ANSWER: &str =
    "Sorry, the assistant is temporarily unavailable. Please try again.";

/// Wire path to the assistant: direct to the backend or through the relay
#[async_trait]
pub trait AssistantTransport: Send + Sync {
    /// Returns the response body, expected to carry an `answer` string
    async fn query(&self, question: &str, brand: &str, token: &str) -> Result<Value, ClientError>;
}

#[derive(Clone)]
pub struct AssistantProxy {
    transport: Arc<dyn AssistantTransport>,
}

impl AssistantProxy {
    pub fn new(transport: Arc<dyn AssistantTransport>) -> Self {
        Self { transport }
    }

    /// `None` for a blank question, which never reaches the network.
    /// Every failure maps to the fallback answer.
    pub async fn ask(&self, question: &str, brand: &str, token: &str) -> Option<AssistantAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        let answer = match self.transport.query(question, brand, token).await {
            Ok(body) => match body.get("answer").and_then(Value::as_str) {
                Some(answer) => answer.to_string(),
                None => {
                    tracing::warn!("assistant response carried no answer");
                    FALLBACK_ANSWER.to_string()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "assistant query failed");
                FALLBACK_ANSWER.to_string()
            }
        };

        Some(AssistantAnswer(answer))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing sent, transcript unchanged
    Ignored,
    /// Another question is in flight; transcript unchanged
    Busy,
    Answered(AssistantAnswer),
    /// The conversation was reset while the question was in flight; the answer was dropped
    Discarded,
}

struct ChatState {
    transcript: Transcript,
    /// Bumped by `reset`; a submission only appends to the conversation it started in
    generation: u64,
    in_flight: bool,
}

/// Transcript plus the single in-flight slot of the chat input
pub struct ChatSession {
    proxy: AssistantProxy,
    state: Mutex<ChatState>,
}

/// Releases the in-flight slot even if the submission is dropped midway.
/// A slot taken before a reset belongs to the old conversation and is left alone.
struct InFlight<'a> {
    state: &'a Mutex<ChatState>,
    generation: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.generation == self.generation {
            state.in_flight = false;
        }
    }
}

impl ChatSession {
    pub fn new(proxy: AssistantProxy) -> Self {
        Self {
            proxy,
            state: Mutex::new(ChatState {
                transcript: Transcript::with_greeting(),
                generation: 0,
                in_flight: false,
            }),
        }
    }

    pub async fn submit(&self, question: &str, session: &ActiveSession) -> SubmitOutcome {
        let question = question.trim();
        if question.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let generation = {
            let mut state = self.lock();
            if state.in_flight {
                tracing::debug!("chat submission rejected, question already in flight");
                return SubmitOutcome::Busy;
            }
            state.in_flight = true;
            state.transcript.push(ChatTurn::user(question));
            state.generation
        };
        let _slot = InFlight {
            state: &self.state,
            generation,
        };

        let answer = self
            .proxy
            .ask(question, &session.brand, &session.token)
            .await
            .unwrap_or_else(|| AssistantAnswer(FALLBACK_ANSWER.to_string()));

        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!("dropping assistant answer for a conversation that was reset");
            return SubmitOutcome::Discarded;
        }
        state.transcript.push(answer.clone().into_turn());
        tracing::debug!(turns = state.transcript.turns().len(), "chat transcript updated");
        // `state` is released before `_slot` takes the lock again
        drop(state);

        SubmitOutcome::Answered(answer)
    }

    pub fn transcript(&self) -> Transcript {
        self.lock().transcript.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().in_flight
    }

    /// Starts a fresh conversation for the next login. A question still in
    /// flight keeps running but its answer is dropped.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.transcript = Transcript::with_greeting();
        state.in_flight = false;
    }

    fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
