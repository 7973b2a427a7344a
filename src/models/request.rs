//! Join request model and lifecycle types

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Maximum length for requester and host messages
pub const MAX_MESSAGE_LENGTH: usize = 1000;

/// Maximum length for the captured device metadata
pub const MAX_DEVICE_INFO_LENGTH: usize = 100;

/// Lifecycle status of a join request.
///
/// `Pending` is the only non-terminal status; once a request leaves it,
/// it never returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    AutoApproved,
    Declined,
    Cancelled,
    Expired,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::AutoApproved => "AUTO_APPROVED",
            RequestStatus::Declined => "DECLINED",
            RequestStatus::Cancelled => "CANCELLED",
            RequestStatus::Expired => "EXPIRED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Both approval flavors count as a successful join downstream
    pub fn is_approved(&self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::AutoApproved)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(RequestStatus::Pending),
            "APPROVED" => Ok(RequestStatus::Approved),
            "AUTO_APPROVED" => Ok(RequestStatus::AutoApproved),
            "DECLINED" => Ok(RequestStatus::Declined),
            "CANCELLED" => Ok(RequestStatus::Cancelled),
            "EXPIRED" => Ok(RequestStatus::Expired),
            other => Err(format!("unknown request status: {}", other)),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for RequestStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for RequestStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for RequestStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse::<RequestStatus>().map_err(Into::into)
    }
}

/// A user's application to join a hosted event.
///
/// The rating fields and eligibility verdict are snapshots taken at request
/// time; later rating changes never alter past decisions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JoinRequest {
    pub id: i64,
    pub event_id: i64,
    pub requester_user_id: i64,
    /// Denormalized from the event at creation time for authorization checks
    pub host_user_id: i64,
    pub request_message: Option<String>,
    pub status: RequestStatus,
    pub response_message: Option<String>,
    pub requester_rating: f64,
    pub event_min_rating: f64,
    pub is_eligible: bool,
    pub ineligibility_reason: Option<String>,
    pub requester_device_info: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

/// Input for creating a join request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJoinRequest {
    pub event_id: i64,
    pub request_message: Option<String>,
    pub device_info: Option<String>,
}

impl CreateJoinRequest {
    /// Validate input bounds before any remote call is made
    pub fn validate(&self) -> Result<(), String> {
        if let Some(message) = &self.request_message {
            if message.chars().count() > MAX_MESSAGE_LENGTH {
                return Err(format!(
                    "Request message cannot exceed {} characters",
                    MAX_MESSAGE_LENGTH
                ));
            }
        }

        if let Some(device_info) = &self.device_info {
            if device_info.chars().count() > MAX_DEVICE_INFO_LENGTH {
                return Err(format!(
                    "Device info cannot exceed {} characters",
                    MAX_DEVICE_INFO_LENGTH
                ));
            }
        }

        Ok(())
    }
}

/// Row payload handed to the store on creation; `id` and `requested_at`
/// are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewJoinRequest {
    pub event_id: i64,
    pub requester_user_id: i64,
    pub host_user_id: i64,
    pub request_message: Option<String>,
    pub status: RequestStatus,
    pub requester_rating: f64,
    pub event_min_rating: f64,
    pub is_eligible: bool,
    pub ineligibility_reason: Option<String>,
    pub requester_device_info: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// Input for a bulk approve/decline operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkRespondRequest {
    pub request_ids: Vec<i64>,
    pub approved: bool,
    pub response_message: Option<String>,
}

impl BulkRespondRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.request_ids.is_empty() {
            return Err("At least one request ID is required".to_string());
        }

        if let Some(message) = &self.response_message {
            if message.chars().count() > MAX_MESSAGE_LENGTH {
                return Err(format!(
                    "Response message cannot exceed {} characters",
                    MAX_MESSAGE_LENGTH
                ));
            }
        }

        Ok(())
    }
}

/// Outcome of a bulk respond: transitions that committed, plus any row
/// that lost its conditional update between validation and mutation.
#[derive(Debug, Clone, Default)]
pub struct BulkRespondOutcome {
    pub updated: Vec<JoinRequest>,
    pub skipped: Vec<i64>,
}

/// Aggregated per-status counts for a requester or an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestStatistics {
    pub total_requests: i64,
    pub pending_requests: i64,
    pub approved_requests: i64,
    pub auto_approved_requests: i64,
    pub declined_requests: i64,
    pub cancelled_requests: i64,
    pub expired_requests: i64,
    /// Percentage of requests that ended in a successful join
    pub approval_rate: f64,
    pub average_response_time_minutes: Option<i64>,
}

/// A page of results with stable descending request-time ordering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: i64, page_size: i64, total_items: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total_items + page_size - 1) / page_size
        } else {
            0
        };

        Self { items, page, page_size, total_items, total_pages }
    }
}
