//! Conversation data model shared by every Vexa crate.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Role / TurnKind
// =============================================================================

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Input modality a turn originated from.
///
/// Audio-origin turns still carry text content (a transcript or a reply).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnKind {
    Text,
    Audio,
}

impl fmt::Display for TurnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnKind::Text => write!(f, "text"),
            TurnKind::Audio => write!(f, "audio"),
        }
    }
}

// =============================================================================
// Turn
// =============================================================================

/// One message exchanged in the conversation.
///
/// Fields are private so a turn cannot change after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    id: Uuid,
    role: Role,
    content: String,
    #[serde(rename = "type")]
    kind: TurnKind,
    #[serde(rename = "timestamp")]
    created_at: DateTime<Utc>,
}

impl Turn {
    /// Create a turn stamped with a time-ordered id and the current time.
    pub fn new(role: Role, content: impl Into<String>, kind: TurnKind) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            content: content.into(),
            kind,
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>, kind: TurnKind) -> Self {
        Self::new(Role::User, content, kind)
    }

    pub fn assistant(content: impl Into<String>, kind: TurnKind) -> Self {
        Self::new(Role::Assistant, content, kind)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> TurnKind {
        self.kind
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// =============================================================================
// ContextMessage
// =============================================================================

/// Wire form of one entry of a serialized context window.
///
/// Clients may send full turns; fields other than `role` and `content`
/// are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: Role,
    pub content: String,
}

impl ContextMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&Turn> for ContextMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
