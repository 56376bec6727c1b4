//! Prompt assembly: preamble, role-prefixed history, then the new user line.

use vexa_core::types::ContextMessage;

/// Default opening sentence of every prompt.
pub const DEFAULT_PREAMBLE: &str = "You are a helpful AI assistant.";

/// Builds single-string prompts from a context window.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    preamble: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_PREAMBLE)
    }
}

impl PromptBuilder {
    pub fn new(preamble: impl Into<String>) -> Self {
        Self {
            preamble: preamble.into(),
        }
    }

    /// Render the window as `role: content` lines, oldest first.
    pub fn render_history(window: &[ContextMessage]) -> String {
        window
            .iter()
            .map(|msg| format!("{}: {}", msg.role, msg.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn build(&self, window: &[ContextMessage], user_text: &str) -> String {
        format!(
            "{} Here's the conversation history:\n{}\n\nUser: {}\n\nAssistant:",
            self.preamble,
            Self::render_history(window),
            user_text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vexa_core::types::Role;

    #[test]
    fn test_render_history_role_prefixed() {
        let window = vec![
            ContextMessage::new(Role::User, "Hi"),
            ContextMessage::new(Role::Assistant, "Hello"),
        ];
        assert_eq!(
            PromptBuilder::render_history(&window),
            "user: Hi\nassistant: Hello"
        );
    }

    #[test]
    fn test_build_full_prompt() {
        let window = vec![
            ContextMessage::new(Role::User, "Hi"),
            ContextMessage::new(Role::Assistant, "Hello"),
        ];
        let prompt = PromptBuilder::default().build(&window, "What's up?");
        assert_eq!(
            prompt,
            "You are a helpful AI assistant. Here's the conversation history:\n\
             user: Hi\nassistant: Hello\n\nUser: What's up?\n\nAssistant:"
        );
    }

    #[test]
    fn test_build_empty_history() {
        let prompt = PromptBuilder::default().build(&[], "Hi");
        assert_eq!(
            prompt,
            "You are a helpful AI assistant. Here's the conversation history:\n\n\nUser: Hi\n\nAssistant:"
        );
    }

    #[test]
    fn test_custom_preamble() {
        let prompt = PromptBuilder::new("You are terse.").build(&[], "Hi");
        assert!(prompt.starts_with("You are terse. Here's the conversation history:"));
    }

    #[test]
    fn test_multiline_content_kept_verbatim() {
        let window = vec![ContextMessage::new(Role::User, "line one\nline two")];
        let history = PromptBuilder::render_history(&window);
        assert_eq!(history, "user: line one\nline two");
    }
}
