//! Snapshot DTOs fetched from the collaborator services
//!
//! These mirror the JSON the event, user, and rating services expose; only
//! the fields the orchestration core consumes are deserialized.

use serde::{Deserialize, Serialize};

/// Event state at request-creation time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    pub id: i64,
    pub title: String,
    pub host_user_id: i64,
    pub host_username: Option<String>,
    pub min_rating: Option<f64>,
    pub max_participants: i32,
    pub current_participants: i32,
    pub auto_approve: bool,
    /// Event-specific structured criteria for the custom eligibility hook
    pub eligibility_criteria: Option<serde_json::Value>,
    pub status: Option<String>,
}

impl EventSnapshot {
    pub fn is_full(&self) -> bool {
        self.current_participants >= self.max_participants
    }
}

/// Requester profile snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    pub id: i64,
    pub username: String,
    pub profile_image_url: Option<String>,
}

/// Requester trust summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub user_id: i64,
    pub average_rating: Option<f64>,
    pub total_ratings: i32,
}
