//! Policy-bound prompt composition.
//!
//! Builds the single instruction block handed to the reasoning engine:
//! role framing for the organization, the fixed triage method, the
//! organization's persona override, its guardrail constraints, and the
//! serialized prior turns in chronological order.

use crate::domain::conversation::Message;

/// Everything the composer needs for one exchange.
#[derive(Debug, Clone)]
pub struct PromptContext<'a> {
    pub org_name: &'a str,
    pub persona_prompt: Option<&'a str>,
    pub guardrails: &'a [String],
    /// Prior turns, most-recent-first as returned by the history query.
    pub history: &'a [Message],
}

/// Composes the full system instruction block for one query.
pub fn compose(ctx: &PromptContext<'_>) -> String {
    let persona = ctx.persona_prompt.unwrap_or("");
    let guardrails = ctx.guardrails.join(", ");
    let transcript = serialize_history(ctx.history);

    format!(
        "You are a helpful Developer Relations engineer from the {org} team that helps users \
with the documentation & bugs they encounter.

When responding to queries, follow this thought process:
1. First, understand the type of query:
- Is it a bug report?
- Is it a documentation gap?
- Is it a feature request?
- Is it a general question about functionality?

2. For each query:
- Search the documentation thoroughly
- If it's a bug, look for similar issues or known limitations
- If it's a documentation gap, identify the closest related content
- If it's a feature request, check if it exists or if there are workarounds

3. Structure your response:
- Acknowledge the specific type of query
- Share relevant documentation snippets
- If it's a bug, suggest potential solutions or workarounds
- If documentation is missing, explain what exists and what's missing
- If a feature doesn't exist, suggest alternatives or workarounds

4. Always:
- Be empathetic to the developer's situation
- Provide clear, actionable next steps
- Acknowledge limitations in your knowledge
- Suggest where to get more help if needed

Your DevRel Persona : {persona}

Keep the following guardrails in mind : {guardrails}

Previous conversation:
{transcript}

Only respond based on the pointers shared, the retrieved documentation, and in context to \
the {org} documentation. If you can't find an answer, acknowledge it clearly. Keep \
responses short, helpful, and source-backed.",
        org = ctx.org_name,
        persona = persona,
        guardrails = guardrails,
        transcript = transcript,
    )
}

/// Serializes history as `role: content` lines, oldest first.
///
/// The history query returns most-recent-first, so the turns are
/// reversed here to read chronologically.
fn serialize_history(history: &[Message]) -> String {
    history
        .iter()
        .rev()
        .map(|msg| format!("{}: {}", msg.role.as_str(), msg.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Role;
    use crate::domain::foundation::ConversationId;

    fn message(conversation: ConversationId, role: Role, content: &str) -> Message {
        Message::new(conversation, role, content)
    }

    #[test]
    fn persona_and_guardrails_appear_verbatim() {
        let guardrails = vec!["no legal advice".to_string(), "no pricing".to_string()];
        let ctx = PromptContext {
            org_name: "acme",
            persona_prompt: Some("friendly and terse"),
            guardrails: &guardrails,
            history: &[],
        };
        let prompt = compose(&ctx);
        assert!(prompt.contains("friendly and terse"));
        assert!(prompt.contains("no legal advice"));
        assert!(prompt.contains("no pricing"));
        assert!(prompt.contains("the acme team"));
    }

    #[test]
    fn missing_persona_leaves_the_section_empty() {
        let ctx = PromptContext {
            org_name: "acme",
            persona_prompt: None,
            guardrails: &[],
            history: &[],
        };
        let prompt = compose(&ctx);
        assert!(prompt.contains("Your DevRel Persona : \n"));
    }

    #[test]
    fn history_is_serialized_chronologically() {
        let id = ConversationId::new();
        // Most-recent-first, as the repository returns it.
        let history = vec![
            message(id, Role::Assistant, "second"),
            message(id, Role::User, "first"),
        ];
        let ctx = PromptContext {
            org_name: "acme",
            persona_prompt: None,
            guardrails: &[],
            history: &history,
        };
        let prompt = compose(&ctx);
        let first = prompt.find("user: first").expect("user turn present");
        let second = prompt.find("assistant: second").expect("assistant turn present");
        assert!(first < second);
    }

    #[test]
    fn triage_method_is_always_present() {
        let ctx = PromptContext {
            org_name: "acme",
            persona_prompt: None,
            guardrails: &[],
            history: &[],
        };
        let prompt = compose(&ctx);
        assert!(prompt.contains("Is it a bug report?"));
        assert!(prompt.contains("Is it a documentation gap?"));
        assert!(prompt.contains("Is it a feature request?"));
        assert!(prompt.contains("Is it a general question about functionality?"));
    }
}
