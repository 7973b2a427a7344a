//! Request store contract
//!
//! The store is a passive persistence boundary: it enforces no business
//! rules beyond uniqueness and the conditional-transition primitive. The
//! orchestrator is the only writer.

use std::collections::HashMap;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{JoinRequest, NewJoinRequest, Page, RequestStatus};
use crate::utils::errors::Result;

/// Durable record of join requests and their lifecycle.
///
/// `transition` and `bulk_transition` are compare-and-swap operations on the
/// current status: an update only applies while the row still carries the
/// expected status, which serializes racing transitions without any
/// application-level locking.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Persist a new request; the store assigns id and requested_at
    async fn create(&self, new_request: NewJoinRequest) -> Result<JoinRequest>;

    async fn find_by_id(&self, id: i64) -> Result<Option<JoinRequest>>;

    async fn find_by_event_and_requester(
        &self,
        event_id: i64,
        requester_user_id: i64,
    ) -> Result<Option<JoinRequest>>;

    /// Whether an active (pending or approved) request exists for the pair
    async fn exists_active(&self, event_id: i64, requester_user_id: i64) -> Result<bool>;

    async fn count_pending_by_requester(&self, requester_user_id: i64) -> Result<i64>;

    /// Requests sent by a user, requested_at descending
    async fn list_by_requester(
        &self,
        requester_user_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Page<JoinRequest>>;

    /// Requests received by a host, optionally narrowed to one event
    async fn list_by_host(
        &self,
        host_user_id: i64,
        event_id: Option<i64>,
        page: i64,
        page_size: i64,
    ) -> Result<Page<JoinRequest>>;

    async fn list_by_event(
        &self,
        event_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Page<JoinRequest>>;

    async fn list_pending_by_host(&self, host_user_id: i64) -> Result<Vec<JoinRequest>>;

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<JoinRequest>>;

    /// Conditional status transition. Returns the updated row, or `None`
    /// when the row no longer carries `expected` (a concurrent transition
    /// won the race).
    async fn transition(
        &self,
        id: i64,
        expected: RequestStatus,
        next: RequestStatus,
        response_message: Option<String>,
        responded_at: DateTime<Utc>,
    ) -> Result<Option<JoinRequest>>;

    /// Conditional transition over many rows; returns only the rows that
    /// still carried `expected` and were updated.
    async fn bulk_transition(
        &self,
        ids: &[i64],
        expected: RequestStatus,
        next: RequestStatus,
        response_message: Option<String>,
        responded_at: DateTime<Utc>,
    ) -> Result<Vec<JoinRequest>>;

    async fn status_counts_by_requester(
        &self,
        requester_user_id: i64,
    ) -> Result<HashMap<RequestStatus, i64>>;

    async fn status_counts_by_event(&self, event_id: i64) -> Result<HashMap<RequestStatus, i64>>;

    /// Average minutes between requested_at and responded_at for a host
    async fn average_response_time_minutes(&self, host_user_id: i64) -> Result<Option<f64>>;

    /// All PENDING requests whose expiry deadline has passed
    async fn find_expired(&self, now: DateTime<Utc>) -> Result<Vec<JoinRequest>>;

    /// Delete terminal requests older than the cutoff. Pending and approved
    /// rows are never purged.
    async fn purge_terminal_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}
