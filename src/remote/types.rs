//! Remote API types
//!
//! DTOs for the Hae server. Field names follow the wire format
//! (`nid`/`cid` are server-assigned integer ids).

use serde::{Deserialize, Serialize};

// ============== Network Types ==============

/// A network: a named subject the user stores facts about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub nid: i64,
    pub name: String,
}

/// Request to rename a network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

// ============== Content Types ==============

/// A content: one stored text statement, owned by a network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub cid: i64,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
}

/// Request to update a content's text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateContentRequest {
    pub content: String,
}

// ============== Chat Types ==============

/// Message role in the conversation transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single transcript message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Request to persist a fact; absent `nid` asks the server to infer or
/// create the network from the text itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nid: Option<i64>,
    pub text: String,
}

/// Request to answer a question from stored facts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub name: String,
    pub nid: i64,
    pub messages: Vec<Message>,
}

/// Response from the query endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub message: String,
    pub answer: String,
    #[serde(default)]
    pub date: Option<String>,
}

// ============== Action Classification ==============

/// Request to classify a raw submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub text: String,
}

/// Classified intent of a submission; `send` means ask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Send,
    Save,
}

/// Response from the classification endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub action_type: ActionType,
}

// ============== Generic Responses ==============

/// Plain confirmation from write endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub version: String,
}

// ============== Error Types ==============

/// Error body from the server; older endpoints use `message`, newer
/// ones `error`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorResponse {
    /// Server-provided detail, falling back to a generic marker
    pub fn detail(self) -> String {
        self.error
            .or(self.message)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}
