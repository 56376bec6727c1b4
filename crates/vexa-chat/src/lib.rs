//! Conversational core for Vexa.
//!
//! Provides the rolling context store, prompt assembly, the text and audio
//! turn pipelines, and the session that ties them to one conversation.

pub mod audio;
pub mod context;
pub mod error;
pub mod handler;
pub mod outcome;
pub mod prompt;
pub mod scratch;
pub mod session;

pub use audio::{AudioTurnState, AudioTurnTracker};
pub use context::ContextStore;
pub use error::ChatError;
pub use handler::TurnHandler;
pub use outcome::{AudioReply, FailureKind, TextReply, TurnFailure, TurnResult};
pub use prompt::PromptBuilder;
pub use scratch::{ScratchDir, ScratchFile};
pub use session::ChatSession;
