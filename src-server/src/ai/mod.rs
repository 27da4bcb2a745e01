//! AI Assist
//!
//! Drafts card content through an OpenAI-compatible chat completion endpoint.

mod prompt;
mod client;

pub use client::{AiClient, DEFAULT_AI_BASE_URL, DEFAULT_AI_MODEL};
pub use prompt::{build_prompt, AiAction, AiReply, AiRequest};
