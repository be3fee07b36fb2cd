use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::UserProfile;

const MAX_SKILLS: usize = 100;
const MAX_SKILL_LEN: usize = 64;

/// Request for ranked postings and skill gaps
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(custom(function = "validate_skills"))]
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub seniority: Option<String>,
    #[validate(range(min = 1, max = 100))]
    #[serde(alias = "top_k", rename = "topK")]
    pub top_k: Option<u16>,
    #[validate(range(min = 1, max = 100))]
    #[serde(alias = "top_n", rename = "topN")]
    pub top_n: Option<u16>,
}

impl RecommendRequest {
    /// Profile carried by the request; an unrecognized level is dropped
    pub fn profile(&self) -> UserProfile {
        UserProfile::from_raw(self.skills.iter().cloned(), self.seniority.as_deref())
    }
}

/// Role of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request to the career assistant
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[validate(custom(function = "validate_skills"))]
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub seniority: Option<String>,
}

impl ChatRequest {
    pub fn profile(&self) -> UserProfile {
        UserProfile::from_raw(self.skills.iter().cloned(), self.seniority.as_deref())
    }
}

fn validate_skills(skills: &Vec<String>) -> Result<(), ValidationError> {
    if skills.len() > MAX_SKILLS {
        return Err(ValidationError::new("too_many_skills"));
    }

    for skill in skills {
        let len = skill.trim().chars().count();
        if len == 0 || len > MAX_SKILL_LEN {
            return Err(ValidationError::new("skill_length"));
        }
    }

    Ok(())
}
