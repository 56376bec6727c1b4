//! Bounded conversation context.
//!
//! Keeps an ordered log of turns and hands out the most recent
//! `max_turns` of them as the context window for generation.

use std::collections::VecDeque;

use vexa_core::config::{ContextConfig, RetentionPolicy};
use vexa_core::types::{ContextMessage, Turn};

/// Default number of turns in the exported window.
pub const DEFAULT_MAX_TURNS: usize = 5;

// =============================================================================
// ContextStore
// =============================================================================

/// Append-only turn log with a bounded exported window.
///
/// With [`RetentionPolicy::Amortized`] the log holds up to `2 * max_turns`
/// turns and is cut back to that size when it overflows, so trimming
/// happens in batches. With [`RetentionPolicy::Eager`] the log never holds
/// more than `max_turns`. Either way `export_window` returns at most
/// `max_turns` turns, oldest first, and discarded turns are gone for good.
#[derive(Debug, Clone)]
pub struct ContextStore {
    turns: VecDeque<Turn>,
    max_turns: usize,
    retention: RetentionPolicy,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

impl ContextStore {
    /// Create an empty store with amortized retention.
    pub fn new(max_turns: usize) -> Self {
        Self::with_retention(max_turns, RetentionPolicy::Amortized)
    }

    pub fn with_retention(max_turns: usize, retention: RetentionPolicy) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_turns.saturating_mul(2)),
            max_turns,
            retention,
        }
    }

    pub fn from_config(config: &ContextConfig) -> Self {
        Self::with_retention(config.max_turns, config.retention)
    }

    /// Add a turn to the end of the log, trimming the oldest on overflow.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push_back(turn);

        let capacity = self.capacity();
        if self.turns.len() > capacity {
            let excess = self.turns.len() - capacity;
            self.turns.drain(..excess);
            tracing::trace!(discarded = excess, retained = capacity, "Context trimmed");
        }
    }

    /// Copy out the last `min(max_turns, len)` turns, oldest first.
    pub fn export_window(&self) -> Vec<Turn> {
        let skip = self.turns.len().saturating_sub(self.max_turns);
        self.turns.iter().skip(skip).cloned().collect()
    }

    /// The exported window in wire form.
    pub fn export_messages(&self) -> Vec<ContextMessage> {
        let skip = self.turns.len().saturating_sub(self.max_turns);
        self.turns
            .iter()
            .skip(skip)
            .map(ContextMessage::from)
            .collect()
    }

    /// Remove every retained turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Number of turns currently retained (may exceed the window).
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// Largest number of turns the log may hold.
    pub fn capacity(&self) -> usize {
        match self.retention {
            RetentionPolicy::Amortized => self.max_turns.saturating_mul(2),
            RetentionPolicy::Eager => self.max_turns,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use vexa_core::types::{Role, TurnKind};

    fn turn(n: usize) -> Turn {
        Turn::user(format!("T{}", n), TurnKind::Text)
    }

    fn contents(turns: &[Turn]) -> Vec<String> {
        turns.iter().map(|t| t.content().to_string()).collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = ContextStore::default();
        assert!(store.is_empty());
        assert_eq!(store.max_turns(), 5);
        assert_eq!(store.retention(), RetentionPolicy::Amortized);
        assert!(store.export_window().is_empty());
    }

    #[test]
    fn test_twelve_appends_export_last_five() {
        let mut store = ContextStore::new(5);
        for i in 1..=12 {
            store.append(turn(i));
        }
        assert_eq!(
            contents(&store.export_window()),
            vec!["T8", "T9", "T10", "T11", "T12"]
        );
    }

    #[test]
    fn test_window_shorter_than_bound() {
        let mut store = ContextStore::new(5);
        store.append(turn(1));
        store.append(turn(2));
        assert_eq!(contents(&store.export_window()), vec!["T1", "T2"]);
    }

    #[test]
    fn test_amortized_retains_up_to_double() {
        let mut store = ContextStore::new(5);
        for i in 1..=10 {
            store.append(turn(i));
        }
        // At exactly 2x no trimming yet
        assert_eq!(store.len(), 10);

        store.append(turn(11));
        assert_eq!(store.len(), 10);
        assert_eq!(store.export_window().len(), 5);
    }

    #[test]
    fn test_amortized_trim_keeps_most_recent() {
        let mut store = ContextStore::new(2);
        for i in 1..=5 {
            store.append(turn(i));
        }
        assert_eq!(store.len(), 4);
        assert_eq!(contents(&store.export_window()), vec!["T4", "T5"]);
    }

    #[test]
    fn test_eager_never_exceeds_window() {
        let mut store = ContextStore::with_retention(3, RetentionPolicy::Eager);
        for i in 1..=7 {
            store.append(turn(i));
            assert!(store.len() <= 3);
        }
        assert_eq!(contents(&store.export_window()), vec!["T5", "T6", "T7"]);
    }

    #[test]
    fn test_retained_size_bounded_for_any_sequence() {
        for max in 1..=6 {
            for policy in [RetentionPolicy::Amortized, RetentionPolicy::Eager] {
                let mut store = ContextStore::with_retention(max, policy);
                for i in 0..50 {
                    store.append(turn(i));
                    assert!(store.len() <= 2 * max);
                    let window = store.export_window();
                    assert!(window.len() <= max);
                    // Window is the most recent turns in original order
                    let expected: Vec<String> = (0..=i)
                        .skip((i + 1).saturating_sub(max))
                        .map(|n| format!("T{}", n))
                        .collect();
                    assert_eq!(contents(&window), expected);
                }
            }
        }
    }

    #[test]
    fn test_no_reordering_or_dedup() {
        let mut store = ContextStore::new(5);
        store.append(Turn::user("same", TurnKind::Text));
        store.append(Turn::user("same", TurnKind::Text));
        store.append(Turn::assistant("reply", TurnKind::Audio));
        let window = store.export_window();
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].content(), "same");
        assert_eq!(window[1].content(), "same");
        assert_eq!(window[2].role(), Role::Assistant);
        assert!(window[0].id() != window[1].id());
    }

    #[test]
    fn test_export_is_a_snapshot() {
        let mut store = ContextStore::new(5);
        store.append(turn(1));
        let mut window = store.export_window();
        window.clear();
        window.push(turn(99));
        assert_eq!(contents(&store.export_window()), vec!["T1"]);
    }

    #[test]
    fn test_clear_then_export_is_empty() {
        let mut store = ContextStore::new(5);
        for i in 1..=7 {
            store.append(turn(i));
        }
        store.clear();
        assert!(store.is_empty());
        assert!(store.export_window().is_empty());

        // Usable after clear
        store.append(turn(8));
        assert_eq!(contents(&store.export_window()), vec!["T8"]);
    }

    #[test]
    fn test_export_messages_matches_window() {
        let mut store = ContextStore::new(2);
        store.append(Turn::user("Hi", TurnKind::Text));
        store.append(Turn::assistant("Hello", TurnKind::Text));
        store.append(Turn::user("How are you?", TurnKind::Audio));
        let messages = store.export_messages();
        assert_eq!(
            messages,
            vec![
                ContextMessage::new(Role::Assistant, "Hello"),
                ContextMessage::new(Role::User, "How are you?"),
            ]
        );
    }

    #[test]
    fn test_zero_window_retains_nothing() {
        let mut store = ContextStore::new(0);
        store.append(turn(1));
        assert_eq!(store.len(), 0);
        assert!(store.export_window().is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = ContextConfig {
            max_turns: 3,
            retention: RetentionPolicy::Eager,
        };
        let store = ContextStore::from_config(&config);
        assert_eq!(store.max_turns(), 3);
        assert_eq!(store.capacity(), 3);
    }
}
