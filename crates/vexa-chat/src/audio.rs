//! Audio turn lifecycle state machine.
//!
//! Enforces the linear pipeline of one audio request:
//! - Received -> Persisted (scratch file written)
//! - Persisted -> Transcribed (transcript or sentinel obtained)
//! - Transcribed -> Replied (generation succeeded, synthesis attempted)
//! - Replied -> CleanedUp (scratch file deleted)
//! - Received/Persisted/Transcribed/Replied -> Failed

use std::fmt;

use uuid::Uuid;

use crate::error::ChatError;

/// Stage of an audio turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioTurnState {
    /// Upload accepted, nothing written yet.
    Received,
    /// Scratch file written.
    Persisted,
    /// Transcript or sentinel obtained.
    Transcribed,
    /// Reply generated and synthesis attempted.
    Replied,
    /// Scratch file deleted; the turn succeeded.
    CleanedUp,
    /// A hard failure ended the turn.
    Failed,
}

impl fmt::Display for AudioTurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioTurnState::Received => write!(f, "Received"),
            AudioTurnState::Persisted => write!(f, "Persisted"),
            AudioTurnState::Transcribed => write!(f, "Transcribed"),
            AudioTurnState::Replied => write!(f, "Replied"),
            AudioTurnState::CleanedUp => write!(f, "CleanedUp"),
            AudioTurnState::Failed => write!(f, "Failed"),
        }
    }
}

impl AudioTurnState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &AudioTurnState) -> bool {
        matches!(
            (self, target),
            (AudioTurnState::Received, AudioTurnState::Persisted)
                | (AudioTurnState::Persisted, AudioTurnState::Transcribed)
                | (AudioTurnState::Transcribed, AudioTurnState::Replied)
                | (AudioTurnState::Replied, AudioTurnState::CleanedUp)
                | (AudioTurnState::Received, AudioTurnState::Failed)
                | (AudioTurnState::Persisted, AudioTurnState::Failed)
                | (AudioTurnState::Transcribed, AudioTurnState::Failed)
                | (AudioTurnState::Replied, AudioTurnState::Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AudioTurnState::CleanedUp | AudioTurnState::Failed)
    }
}

/// Tracks the state of one audio request.
///
/// Owned by a single request, so no locking.
#[derive(Debug)]
pub struct AudioTurnTracker {
    request_id: Uuid,
    state: AudioTurnState,
}

impl Default for AudioTurnTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioTurnTracker {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            state: AudioTurnState::Received,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn current(&self) -> AudioTurnState {
        self.state
    }

    /// Attempt to move to `target`.
    pub fn transition(&mut self, target: AudioTurnState) -> Result<(), ChatError> {
        if self.state.can_transition_to(&target) {
            tracing::debug!(
                request_id = %self.request_id,
                "Audio turn state: {} -> {}",
                self.state,
                target
            );
            self.state = target;
            Ok(())
        } else {
            Err(ChatError::InvalidTransition {
                from: self.state,
                to: target,
            })
        }
    }

    /// Move to `Failed` unless already terminal.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            tracing::debug!(
                request_id = %self.request_id,
                "Audio turn state: {} -> Failed",
                self.state
            );
            self.state = AudioTurnState::Failed;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [AudioTurnState; 6] = [
        AudioTurnState::Received,
        AudioTurnState::Persisted,
        AudioTurnState::Transcribed,
        AudioTurnState::Replied,
        AudioTurnState::CleanedUp,
        AudioTurnState::Failed,
    ];

    #[test]
    fn test_happy_path_transitions() {
        let mut tracker = AudioTurnTracker::new();
        assert_eq!(tracker.current(), AudioTurnState::Received);
        tracker.transition(AudioTurnState::Persisted).unwrap();
        tracker.transition(AudioTurnState::Transcribed).unwrap();
        tracker.transition(AudioTurnState::Replied).unwrap();
        tracker.transition(AudioTurnState::CleanedUp).unwrap();
        assert!(tracker.current().is_terminal());
    }

    #[test]
    fn test_no_skipping_stages() {
        let mut tracker = AudioTurnTracker::new();
        let err = tracker.transition(AudioTurnState::Transcribed).unwrap_err();
        assert!(matches!(
            err,
            ChatError::InvalidTransition {
                from: AudioTurnState::Received,
                to: AudioTurnState::Transcribed
            }
        ));
        assert_eq!(tracker.current(), AudioTurnState::Received);
    }

    #[test]
    fn test_failed_reachable_from_every_active_state() {
        for state in [
            AudioTurnState::Received,
            AudioTurnState::Persisted,
            AudioTurnState::Transcribed,
            AudioTurnState::Replied,
        ] {
            assert!(state.can_transition_to(&AudioTurnState::Failed), "{}", state);
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for target in ALL {
            assert!(!AudioTurnState::CleanedUp.can_transition_to(&target));
            assert!(!AudioTurnState::Failed.can_transition_to(&target));
        }
    }

    #[test]
    fn test_no_backward_transitions() {
        for (i, from) in ALL.iter().enumerate().take(5) {
            for to in ALL.iter().take(i + 1) {
                assert!(!from.can_transition_to(to), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_fail_is_idempotent_and_respects_terminal() {
        let mut tracker = AudioTurnTracker::new();
        tracker.transition(AudioTurnState::Persisted).unwrap();
        tracker.fail();
        assert_eq!(tracker.current(), AudioTurnState::Failed);
        tracker.fail();
        assert_eq!(tracker.current(), AudioTurnState::Failed);

        let mut done = AudioTurnTracker::new();
        done.transition(AudioTurnState::Persisted).unwrap();
        done.transition(AudioTurnState::Transcribed).unwrap();
        done.transition(AudioTurnState::Replied).unwrap();
        done.transition(AudioTurnState::CleanedUp).unwrap();
        done.fail();
        assert_eq!(done.current(), AudioTurnState::CleanedUp);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(AudioTurnState::CleanedUp.to_string(), "CleanedUp");
        assert_eq!(AudioTurnState::Failed.to_string(), "Failed");
    }
}
