//! Career assistant: conversational layer on top of the recommendation core
//!
//! The generated text is opaque. Suggested postings and skill
//! recommendations in the reply always come from the core's structured
//! output, which is also fed to the model as grounding.

pub mod prompts;

use thiserror::Error;
use tracing::Instrument;
use validator::Validate;

use crate::config::LlmSettings;
use crate::core::{CatalogSnapshot, RecommendError};
use crate::models::{ChatMessage, ChatReply, ChatRequest, ChatRole, Recommendation};
use crate::services::{GenerationOptions, LlmClient, LlmError, RecommendationService, ServiceError};

/// Errors surfaced by the career assistant
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Request validation failed: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Text generation failed: {0}")]
    Generation(#[from] LlmError),
}

impl From<RecommendError> for AdvisorError {
    fn from(value: RecommendError) -> Self {
        AdvisorError::Service(ServiceError::Recommend(value))
    }
}

/// Limits applied when assembling a conversation
#[derive(Debug, Clone, Copy)]
pub struct ConversationLimits {
    pub history: usize,
    pub catalog_context: usize,
    pub top_k: usize,
    pub top_n: usize,
}

impl Default for ConversationLimits {
    fn default() -> Self {
        Self {
            history: 10,
            catalog_context: 10,
            top_k: 5,
            top_n: 5,
        }
    }
}

/// Career assistant backed by a text-generation client
#[derive(Clone)]
pub struct Advisor {
    llm: LlmClient,
    options: GenerationOptions,
    limits: ConversationLimits,
}

impl Advisor {
    pub fn new(llm: LlmClient, options: GenerationOptions, limits: ConversationLimits) -> Self {
        Self {
            llm,
            options,
            limits,
        }
    }

    /// Build an advisor from settings, using recommendation defaults for top_k/top_n
    pub fn from_settings(
        llm: LlmClient,
        settings: &LlmSettings,
        top_k: usize,
        top_n: usize,
    ) -> Self {
        Self::new(
            llm,
            GenerationOptions {
                temperature: settings.temperature,
                max_tokens: settings.max_tokens,
            },
            ConversationLimits {
                history: settings.history_limit,
                catalog_context: settings.catalog_context_limit,
                top_k,
                top_n,
            },
        )
    }

    /// Answer a user message, grounded in the current catalog snapshot
    pub async fn chat(
        &self,
        service: &RecommendationService,
        request: &ChatRequest,
    ) -> Result<ChatReply, AdvisorError> {
        request.validate()?;

        let request_id = uuid::Uuid::new_v4();
        self.respond(service, request)
            .instrument(tracing::info_span!("chat", %request_id))
            .await
    }

    async fn respond(
        &self,
        service: &RecommendationService,
        request: &ChatRequest,
    ) -> Result<ChatReply, AdvisorError> {
        let snapshot = service.snapshot().await?;
        let profile = request.profile();
        let recommendation =
            service.recommend_profile(&profile, &snapshot, self.limits.top_k, self.limits.top_n)?;

        let messages = prepare_messages(request, &recommendation, &snapshot, &self.limits);

        tracing::info!(
            "Sending {} messages to model {} ({} matches, {} gaps)",
            messages.len(),
            self.llm.model(),
            recommendation.matches.len(),
            recommendation.gaps.len()
        );

        let response = self.llm.complete(&messages, self.options).await?;

        Ok(ChatReply {
            response,
            suggested_postings: recommendation.matches.iter().map(|m| m.posting_id).collect(),
            skill_recommendations: recommendation.gaps.into_iter().map(|g| g.skill).collect(),
        })
    }
}

/// Assemble the conversation sent to the model
///
/// Order: catalog system prompt, grounding system message, the most recent
/// `limits.history` history messages, then the new user message. System
/// messages supplied in the history are dropped.
pub fn prepare_messages(
    request: &ChatRequest,
    recommendation: &Recommendation,
    snapshot: &CatalogSnapshot,
    limits: &ConversationLimits,
) -> Vec<ChatMessage> {
    let profile = request.profile();

    let mut messages = vec![
        ChatMessage::system(prompts::catalog_prompt(snapshot, limits.catalog_context)),
        ChatMessage::system(prompts::grounding_prompt(&profile, recommendation, snapshot)),
    ];

    let history: Vec<&ChatMessage> = request
        .history
        .iter()
        .filter(|m| m.role != ChatRole::System)
        .collect();
    let skip = history.len().saturating_sub(limits.history);
    messages.extend(history.into_iter().skip(skip).cloned());

    messages.push(ChatMessage::user(request.message.clone()));
    messages
}
