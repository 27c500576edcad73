// Chat transcript domain model
use serde::Serialize;

pub const GREETING: &str = "Hi, I'm your GearGenie assistant. Ask me anything about engine, battery, brakes, fleet health or global ranking for your brand.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only conversation, oldest turn first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn with_greeting() -> Self {
        Self {
            turns: vec![ChatTurn::assistant(GREETING)],
        }
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }
}

/// Reply text for one assistant turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantAnswer(pub String);

impl AssistantAnswer {
    pub fn into_turn(self) -> ChatTurn {
        ChatTurn::assistant(self.0)
    }
}
