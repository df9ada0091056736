use serde::{Deserialize, Serialize};

use crate::models::Message;
/*
    DTO for the HTTP surface. Request types are form bodies, so their
    field names stay snake_case on the wire.
*/

// Submit (POST /submit)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub new_message: Option<String>,
}

impl SubmitRequest {
    /// Testo non vuoto, se presente.
    pub fn text(&self) -> Option<&str> {
        non_empty(self.new_message.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub message: String,
    pub id: i64,
}

// Edit (POST /edit/<id>)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub updated_message: Option<String>,
}

impl EditRequest {
    pub fn text(&self) -> Option<&str> {
        non_empty(self.updated_message.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditResponse {
    pub status: String,
    pub message: String,
}

impl EditResponse {
    pub fn updated(message: impl Into<String>) -> Self {
        Self { status: "updated".to_string(), message: message.into() }
    }
}

// Delete (POST /delete/<id>)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn deleted() -> Self {
        Self { status: "deleted".to_string() }
    }
}

// Health (GET /health)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            database: Some("connected".to_string()),
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            database: None,
            error: Some(error.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

// List messages (GET /api/messages)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<Message>,
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}
