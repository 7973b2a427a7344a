//! Test helpers
//!
//! In-memory implementations of the store, the collaborator gateways, and
//! the notification bus, plus a harness that wires them into a
//! `RequestService` with a configurable policy.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use gatherly_requests::clients::{ChatGateway, EventGateway, IdentityGateway, TrustGateway};
use gatherly_requests::config::RequestConfig;
use gatherly_requests::database::RequestStore;
use gatherly_requests::models::{
    EventSnapshot, JoinRequest, NewJoinRequest, Page, RatingSummary, RequestStatus, UserSnapshot,
};
use gatherly_requests::services::NotificationPublisher;
use gatherly_requests::services::RequestService;
use gatherly_requests::utils::errors::{GatewayError, GatewayResult, Result};

const ACTIVE_STATUSES: [RequestStatus; 3] = [
    RequestStatus::Pending,
    RequestStatus::Approved,
    RequestStatus::AutoApproved,
];

/// In-memory `RequestStore` with the same conditional-transition semantics
/// as the Postgres repository.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    next_id: i64,
    rows: BTreeMap<i64, JoinRequest>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot a row for direct assertions
    pub fn row(&self, id: i64) -> Option<JoinRequest> {
        self.inner.lock().unwrap().rows.get(&id).cloned()
    }

    /// Rewrite a row's expiry deadline, for expiration tests
    pub fn set_expires_at(&self, id: i64, expires_at: DateTime<Utc>) {
        if let Some(row) = self.inner.lock().unwrap().rows.get_mut(&id) {
            row.expires_at = expires_at;
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }

    fn sorted_desc(rows: Vec<JoinRequest>) -> Vec<JoinRequest> {
        let mut rows = rows;
        rows.sort_by(|a, b| b.requested_at.cmp(&a.requested_at).then(b.id.cmp(&a.id)));
        rows
    }

    fn paginate(rows: Vec<JoinRequest>, page: i64, page_size: i64) -> Page<JoinRequest> {
        let total = rows.len() as i64;
        let items = Self::sorted_desc(rows)
            .into_iter()
            .skip((page * page_size) as usize)
            .take(page_size as usize)
            .collect();
        Page::new(items, page, page_size, total)
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn create(&self, new_request: NewJoinRequest) -> Result<JoinRequest> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let row = JoinRequest {
            id: inner.next_id,
            event_id: new_request.event_id,
            requester_user_id: new_request.requester_user_id,
            host_user_id: new_request.host_user_id,
            request_message: new_request.request_message,
            status: new_request.status,
            response_message: None,
            requester_rating: new_request.requester_rating,
            event_min_rating: new_request.event_min_rating,
            is_eligible: new_request.is_eligible,
            ineligibility_reason: new_request.ineligibility_reason,
            requester_device_info: new_request.requester_device_info,
            requested_at: Utc::now(),
            responded_at: None,
            expires_at: new_request.expires_at,
        };
        inner.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<JoinRequest>> {
        Ok(self.inner.lock().unwrap().rows.get(&id).cloned())
    }

    async fn find_by_event_and_requester(
        &self,
        event_id: i64,
        requester_user_id: i64,
    ) -> Result<Option<JoinRequest>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .rows
            .values()
            .find(|r| r.event_id == event_id && r.requester_user_id == requester_user_id)
            .cloned())
    }

    async fn exists_active(&self, event_id: i64, requester_user_id: i64) -> Result<bool> {
        Ok(self.inner.lock().unwrap().rows.values().any(|r| {
            r.event_id == event_id
                && r.requester_user_id == requester_user_id
                && ACTIVE_STATUSES.contains(&r.status)
        }))
    }

    async fn count_pending_by_requester(&self, requester_user_id: i64) -> Result<i64> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .rows
            .values()
            .filter(|r| {
                r.requester_user_id == requester_user_id && r.status == RequestStatus::Pending
            })
            .count() as i64)
    }

    async fn list_by_requester(
        &self,
        requester_user_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Page<JoinRequest>> {
        let rows: Vec<_> = self
            .inner
            .lock()
            .unwrap()
            .rows
            .values()
            .filter(|r| r.requester_user_id == requester_user_id)
            .cloned()
            .collect();
        Ok(Self::paginate(rows, page, page_size))
    }

    async fn list_by_host(
        &self,
        host_user_id: i64,
        event_id: Option<i64>,
        page: i64,
        page_size: i64,
    ) -> Result<Page<JoinRequest>> {
        let rows: Vec<_> = self
            .inner
            .lock()
            .unwrap()
            .rows
            .values()
            .filter(|r| {
                r.host_user_id == host_user_id
                    && event_id.map_or(true, |id| r.event_id == id)
            })
            .cloned()
            .collect();
        Ok(Self::paginate(rows, page, page_size))
    }

    async fn list_by_event(
        &self,
        event_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Page<JoinRequest>> {
        let rows: Vec<_> = self
            .inner
            .lock()
            .unwrap()
            .rows
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        Ok(Self::paginate(rows, page, page_size))
    }

    async fn list_pending_by_host(&self, host_user_id: i64) -> Result<Vec<JoinRequest>> {
        let rows: Vec<_> = self
            .inner
            .lock()
            .unwrap()
            .rows
            .values()
            .filter(|r| r.host_user_id == host_user_id && r.status == RequestStatus::Pending)
            .cloned()
            .collect();
        Ok(Self::sorted_desc(rows))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<JoinRequest>> {
        let inner = self.inner.lock().unwrap();
        Ok(ids.iter().filter_map(|id| inner.rows.get(id).cloned()).collect())
    }

    async fn transition(
        &self,
        id: i64,
        expected: RequestStatus,
        next: RequestStatus,
        response_message: Option<String>,
        responded_at: DateTime<Utc>,
    ) -> Result<Option<JoinRequest>> {
        let mut inner = self.inner.lock().unwrap();
        match inner.rows.get_mut(&id) {
            Some(row) if row.status == expected => {
                row.status = next;
                if response_message.is_some() {
                    row.response_message = response_message;
                }
                row.responded_at = Some(responded_at);
                Ok(Some(row.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn bulk_transition(
        &self,
        ids: &[i64],
        expected: RequestStatus,
        next: RequestStatus,
        response_message: Option<String>,
        responded_at: DateTime<Utc>,
    ) -> Result<Vec<JoinRequest>> {
        let mut inner = self.inner.lock().unwrap();
        let mut updated = Vec::new();
        for id in ids {
            if let Some(row) = inner.rows.get_mut(id) {
                if row.status == expected {
                    row.status = next;
                    if response_message.is_some() {
                        row.response_message = response_message.clone();
                    }
                    row.responded_at = Some(responded_at);
                    updated.push(row.clone());
                }
            }
        }
        Ok(updated)
    }

    async fn status_counts_by_requester(
        &self,
        requester_user_id: i64,
    ) -> Result<HashMap<RequestStatus, i64>> {
        let mut counts = HashMap::new();
        for row in self.inner.lock().unwrap().rows.values() {
            if row.requester_user_id == requester_user_id {
                *counts.entry(row.status).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn status_counts_by_event(&self, event_id: i64) -> Result<HashMap<RequestStatus, i64>> {
        let mut counts = HashMap::new();
        for row in self.inner.lock().unwrap().rows.values() {
            if row.event_id == event_id {
                *counts.entry(row.status).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn average_response_time_minutes(&self, host_user_id: i64) -> Result<Option<f64>> {
        let inner = self.inner.lock().unwrap();
        let durations: Vec<f64> = inner
            .rows
            .values()
            .filter(|r| r.host_user_id == host_user_id)
            .filter_map(|r| {
                r.responded_at
                    .map(|t| (t - r.requested_at).num_seconds() as f64 / 60.0)
            })
            .collect();
        if durations.is_empty() {
            Ok(None)
        } else {
            Ok(Some(durations.iter().sum::<f64>() / durations.len() as f64))
        }
    }

    async fn find_expired(&self, now: DateTime<Utc>) -> Result<Vec<JoinRequest>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .rows
            .values()
            .filter(|r| r.status == RequestStatus::Pending && r.expires_at < now)
            .cloned()
            .collect())
    }

    async fn purge_terminal_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut inner = self.inner.lock().unwrap();
        let doomed: Vec<i64> = inner
            .rows
            .values()
            .filter(|r| {
                !ACTIVE_STATUSES.contains(&r.status) && r.requested_at < cutoff
            })
            .map(|r| r.id)
            .collect();
        for id in &doomed {
            inner.rows.remove(id);
        }
        Ok(doomed.len() as u64)
    }
}

/// Event gateway over a fixed snapshot map, recording participant additions
#[derive(Default)]
pub struct FakeEventGateway {
    events: Mutex<HashMap<i64, EventSnapshot>>,
    pub participants_added: Mutex<Vec<(i64, i64)>>,
    pub fail_add_participant: AtomicBool,
}

impl FakeEventGateway {
    pub fn insert(&self, event: EventSnapshot) {
        self.events.lock().unwrap().insert(event.id, event);
    }

    pub fn added(&self) -> Vec<(i64, i64)> {
        self.participants_added.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventGateway for FakeEventGateway {
    async fn get_event(&self, event_id: i64) -> GatewayResult<EventSnapshot> {
        self.events
            .lock()
            .unwrap()
            .get(&event_id)
            .cloned()
            .ok_or(GatewayError::NotFound { service: "event-service", id: event_id })
    }

    async fn add_participant(&self, event_id: i64, user_id: i64) -> GatewayResult<()> {
        if self.fail_add_participant.load(Ordering::SeqCst) {
            return Err(GatewayError::ServiceUnavailable { service: "event-service" });
        }
        self.participants_added.lock().unwrap().push((event_id, user_id));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeIdentityGateway {
    users: Mutex<HashMap<i64, UserSnapshot>>,
}

impl FakeIdentityGateway {
    pub fn insert(&self, user: UserSnapshot) {
        self.users.lock().unwrap().insert(user.id, user);
    }
}

#[async_trait]
impl IdentityGateway for FakeIdentityGateway {
    async fn get_user(&self, user_id: i64) -> GatewayResult<UserSnapshot> {
        self.users
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or(GatewayError::NotFound { service: "user-service", id: user_id })
    }
}

/// Users without an entry get a collaborator 404, which the orchestrator
/// treats as an empty rating history.
#[derive(Default)]
pub struct FakeTrustGateway {
    ratings: Mutex<HashMap<i64, RatingSummary>>,
}

impl FakeTrustGateway {
    pub fn insert(&self, rating: RatingSummary) {
        self.ratings.lock().unwrap().insert(rating.user_id, rating);
    }
}

#[async_trait]
impl TrustGateway for FakeTrustGateway {
    async fn get_rating_summary(&self, user_id: i64) -> GatewayResult<RatingSummary> {
        self.ratings
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or(GatewayError::NotFound { service: "rating-service", id: user_id })
    }
}

#[derive(Default)]
pub struct FakeChatGateway {
    pub members_added: Mutex<Vec<(i64, i64)>>,
    pub fail: AtomicBool,
}

impl FakeChatGateway {
    pub fn added(&self) -> Vec<(i64, i64)> {
        self.members_added.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatGateway for FakeChatGateway {
    async fn add_member_to_event_room(&self, event_id: i64, user_id: i64) -> GatewayResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::ServiceUnavailable { service: "chat-service" });
        }
        self.members_added.lock().unwrap().push((event_id, user_id));
        Ok(())
    }
}

/// Records every published notification instead of sending it
#[derive(Default)]
pub struct CapturingPublisher {
    published: Mutex<Vec<(String, Value)>>,
}

impl CapturingPublisher {
    pub fn published(&self) -> Vec<(String, Value)> {
        self.published.lock().unwrap().clone()
    }

    pub fn on_channel(&self, channel: &str) -> Vec<Value> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == channel)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationPublisher for CapturingPublisher {
    async fn publish(&self, channel: &str, payload: Value) -> Result<()> {
        self.published.lock().unwrap().push((channel.to_string(), payload));
        Ok(())
    }
}

/// A fully wired orchestrator over in-memory collaborators
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub events: Arc<FakeEventGateway>,
    pub identity: Arc<FakeIdentityGateway>,
    pub trust: Arc<FakeTrustGateway>,
    pub chat: Arc<FakeChatGateway>,
    pub publisher: Arc<CapturingPublisher>,
    pub service: RequestService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_policy(default_policy())
    }

    pub fn with_policy(policy: RequestConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let events = Arc::new(FakeEventGateway::default());
        let identity = Arc::new(FakeIdentityGateway::default());
        let trust = Arc::new(FakeTrustGateway::default());
        let chat = Arc::new(FakeChatGateway::default());
        let publisher = Arc::new(CapturingPublisher::default());

        let service = RequestService::new(
            Arc::clone(&store) as Arc<dyn RequestStore>,
            Arc::clone(&events) as Arc<dyn EventGateway>,
            Arc::clone(&identity) as Arc<dyn IdentityGateway>,
            Arc::clone(&trust) as Arc<dyn TrustGateway>,
            Arc::clone(&chat) as Arc<dyn ChatGateway>,
            Arc::clone(&publisher) as Arc<dyn NotificationPublisher>,
            policy,
        );

        Self { store, events, identity, trust, chat, publisher, service }
    }
}

pub fn default_policy() -> RequestConfig {
    RequestConfig {
        auto_expire_days: 7,
        max_pending_requests: 10,
        allow_duplicate_requests: false,
        default_min_rating: 0.0,
        retention_days: 90,
    }
}

pub fn event(id: i64, host_user_id: i64) -> EventSnapshot {
    EventSnapshot {
        id,
        title: format!("Event {}", id),
        host_user_id,
        host_username: Some(format!("host{}", host_user_id)),
        min_rating: None,
        max_participants: 10,
        current_participants: 2,
        auto_approve: false,
        eligibility_criteria: None,
        status: Some("UPCOMING".to_string()),
    }
}

pub fn user(id: i64) -> UserSnapshot {
    UserSnapshot {
        id,
        username: format!("user{}", id),
        profile_image_url: None,
    }
}

pub fn rating(user_id: i64, average: f64, total: i32) -> RatingSummary {
    RatingSummary {
        user_id,
        average_rating: Some(average),
        total_ratings: total,
    }
}

pub fn join_input(event_id: i64) -> gatherly_requests::models::CreateJoinRequest {
    gatherly_requests::models::CreateJoinRequest {
        event_id,
        request_message: Some("May I join?".to_string()),
        device_info: None,
    }
}
