//! Request/reply types and prompt templates.

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiAction {
    /// Draft a description from the card title
    Generate,
    /// Condense the card content into bullet points
    Summarize,
    /// Break the work into ordered sub-tasks
    Suggest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiRequest {
    pub action: AiAction,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// `{ "result": ... }` or `{ "error": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AiReply {
    Result { result: String },
    Error { error: String },
}

impl From<DomainError> for AiReply {
    fn from(e: DomainError) -> Self {
        AiReply::Error { error: e.to_string() }
    }
}

/// Prompt text for a request. Missing fields become placeholders.
pub fn build_prompt(request: &AiRequest) -> String {
    let title = request.title.as_deref().unwrap_or("(untitled)");
    match request.action {
        AiAction::Generate => format!(
            "You are a project management assistant. Write a concise but informative description \
             for a Kanban card titled \"{}\". Include context, the goal, and the short steps needed to finish it.",
            title
        ),
        AiAction::Summarize => format!(
            "Summarize the following notes into short bullet points with the key highlights:\n{}",
            request.content.as_deref().unwrap_or("No content.")
        ),
        AiAction::Suggest => format!(
            "Break the following work into an ordered list of actionable sub-tasks. Title: \"{}\". \
             Additional description: {}.",
            title,
            request.content.as_deref().unwrap_or("none")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_placeholders() {
        let generate = AiRequest { action: AiAction::Generate, title: None, content: None };
        assert!(build_prompt(&generate).contains("\"(untitled)\""));

        let summarize = AiRequest { action: AiAction::Summarize, title: None, content: None };
        assert!(build_prompt(&summarize).ends_with("No content."));

        let suggest = AiRequest {
            action: AiAction::Suggest,
            title: Some("Ship v2".to_string()),
            content: None,
        };
        let prompt = build_prompt(&suggest);
        assert!(prompt.contains("\"Ship v2\""));
        assert!(prompt.ends_with("description: none."));
    }

    #[test]
    fn test_request_and_reply_wire_format() {
        let request: AiRequest = serde_json::from_str(r#"{"action":"summarize","content":"notes"}"#).unwrap();
        assert_eq!(request.action, AiAction::Summarize);
        assert_eq!(request.title, None);

        let ok = serde_json::to_value(AiReply::Result { result: "done".to_string() }).unwrap();
        assert_eq!(ok, serde_json::json!({ "result": "done" }));
        let err: AiReply = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert_eq!(err, AiReply::Error { error: "boom".to_string() });

        let failed = AiReply::from(DomainError::AiFailure("timeout".to_string()));
        assert_eq!(failed, AiReply::Error { error: "AI request failed: timeout".to_string() });
    }
}
