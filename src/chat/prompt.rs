//! Prompt templates for the two conversation branches.

use crate::faq::Faq;
use crate::llm::ChatMessage;

/// Context used when retrieval finds nothing (or is switched off).
pub const NO_MATCH_CONTEXT: &str = "No relevant FAQ information found.";

const SUPPORT_SYSTEM_TEMPLATE: &str = "You are a helpful customer support AI. Your role is to:
1. If the FAQ context is relevant to the question, provide a detailed answer based on it.
2. If the context says 'No relevant FAQ information found', respond with:
   - A polite acknowledgment that this topic isn't in our FAQ
   - Suggest contacting our support team for specific assistance
   - Do your best to answer the question based on the context provided
   - If possible, mention the topics we do cover (business hours, password reset, payment methods)

Current FAQ context: {context}";

const GREETING_SYSTEM_PROMPT: &str = "You are a friendly customer support AI. Keep your greeting:
1. Warm and welcoming
2. Professional but friendly
3. Brief (1-2 sentences)
4. Include an offer to help with their questions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRole<'a> {
    Greeting { text: &'a str },
    Support { context: &'a str, question: &'a str },
}

pub struct PromptComposer;

impl PromptComposer {
    /// Returns the `[system, user]` message pair for the given role.
    pub fn compose(role: PromptRole<'_>) -> Vec<ChatMessage> {
        match role {
            PromptRole::Greeting { text } => vec![
                ChatMessage::system(GREETING_SYSTEM_PROMPT),
                ChatMessage::user(text),
            ],
            PromptRole::Support { context, question } => vec![
                ChatMessage::system(SUPPORT_SYSTEM_TEMPLATE.replace("{context}", context)),
                ChatMessage::user(question),
            ],
        }
    }

    pub fn greeting(text: &str) -> Vec<ChatMessage> {
        Self::compose(PromptRole::Greeting { text })
    }

    pub fn support(context: &str, question: &str) -> Vec<ChatMessage> {
        Self::compose(PromptRole::Support { context, question })
    }

    /// Renders retrieved FAQs as `question\nanswer` blocks joined by newlines,
    /// or the no-match sentinel when there are none.
    pub fn format_context(faqs: &[Faq]) -> String {
        if faqs.is_empty() {
            return NO_MATCH_CONTEXT.to_string();
        }
        faqs.iter()
            .map(|faq| format!("{}\n{}", faq.question, faq.answer))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatRole;

    #[test]
    fn support_prompt_embeds_context_and_question() {
        let messages = PromptComposer::support("Q1\nA1", "How do I reset my password?");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert!(messages[0]
            .content
            .ends_with("Current FAQ context: Q1\nA1"));
        assert!(messages[0].content.contains("business hours, password reset, payment methods"));
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].content, "How do I reset my password?");
    }

    #[test]
    fn greeting_prompt_passes_text_verbatim() {
        let messages = PromptComposer::greeting("Hello!!");
        assert_eq!(messages[0].content, GREETING_SYSTEM_PROMPT);
        assert_eq!(messages[1], ChatMessage::user("Hello!!"));
    }

    #[test]
    fn compose_is_deterministic() {
        let role = PromptRole::Support {
            context: NO_MATCH_CONTEXT,
            question: "q",
        };
        assert_eq!(PromptComposer::compose(role), PromptComposer::compose(role));
    }

    #[test]
    fn format_context_joins_pairs() {
        let faqs = vec![Faq::new("Q1", "A1"), Faq::new("Q2", "A2")];
        assert_eq!(PromptComposer::format_context(&faqs), "Q1\nA1\nQ2\nA2");
        assert_eq!(PromptComposer::format_context(&[]), NO_MATCH_CONTEXT);
    }
}
