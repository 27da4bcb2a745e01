//! Command for AI-assisted card drafting

use crate::ai::{AiReply, AiRequest};
use crate::domain::{DomainError, DomainResult, Identity};
use crate::AppState;

/// Run an AI action for the caller
pub async fn ai_assist(state: &AppState, identity: &Identity, request: AiRequest) -> DomainResult<AiReply> {
    let client = state
        .ai
        .as_ref()
        .ok_or_else(|| DomainError::Configuration("OPENAI_API_KEY is not configured".to_string()))?;

    log::debug!("AI {:?} requested by {}", request.action, identity.user_id);
    let result = client.complete(&request).await?;
    Ok(AiReply::Result { result })
}
