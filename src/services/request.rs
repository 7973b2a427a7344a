//! Join request orchestration
//!
//! `RequestService` owns the full request lifecycle: creation with
//! eligibility evaluation and auto-approval, host and requester
//! transitions, bulk responses, expiration, and the approval side-effect
//! sequence. It is the only component that mutates join requests; the
//! store below it is a passive persistence boundary and the gateways
//! around it are independently failable collaborators.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::clients::{ChatGateway, EventGateway, IdentityGateway, TrustGateway};
use crate::config::RequestConfig;
use crate::database::RequestStore;
use crate::models::{
    BulkRespondOutcome, BulkRespondRequest, CreateJoinRequest, JoinRequest, NewJoinRequest, Page,
    RatingSummary, RequestStatistics, RequestStatus,
};
use crate::services::eligibility::EligibilityChecker;
use crate::services::publisher::{
    basic_payload, channels, created_payload, expired_payload, NotificationPublisher,
};
use crate::utils::errors::{GatewayError, GatherlyError, Result};
use crate::utils::logging::{log_request_transition, log_side_effect_failure};

#[derive(Clone)]
pub struct RequestService {
    store: Arc<dyn RequestStore>,
    events: Arc<dyn EventGateway>,
    identity: Arc<dyn IdentityGateway>,
    trust: Arc<dyn TrustGateway>,
    chat: Arc<dyn ChatGateway>,
    publisher: Arc<dyn NotificationPublisher>,
    eligibility: EligibilityChecker,
    policy: RequestConfig,
}

impl RequestService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn RequestStore>,
        events: Arc<dyn EventGateway>,
        identity: Arc<dyn IdentityGateway>,
        trust: Arc<dyn TrustGateway>,
        chat: Arc<dyn ChatGateway>,
        publisher: Arc<dyn NotificationPublisher>,
        policy: RequestConfig,
    ) -> Self {
        let eligibility = EligibilityChecker::new(policy.default_min_rating);
        Self { store, events, identity, trust, chat, publisher, eligibility, policy }
    }

    /// Create a join request for an event.
    ///
    /// Collaborator snapshots are fetched before anything is persisted; a
    /// failed or timed-out fetch aborts the creation with
    /// `DependencyUnavailable` and leaves no partial row behind. If the
    /// event auto-approves and the verdict is eligible, the request is
    /// persisted as `AUTO_APPROVED` and the approval side effects run as
    /// part of creation.
    pub async fn create_request(
        &self,
        requester_user_id: i64,
        input: CreateJoinRequest,
    ) -> Result<JoinRequest> {
        info!(
            event_id = input.event_id,
            requester_user_id = requester_user_id,
            "Creating join request"
        );

        input.validate().map_err(GatherlyError::InvalidInput)?;

        let pending_count = self.store.count_pending_by_requester(requester_user_id).await?;
        if pending_count >= self.policy.max_pending_requests {
            return Err(GatherlyError::Conflict(format!(
                "Maximum pending requests limit reached: {}",
                self.policy.max_pending_requests
            )));
        }

        if !self.policy.allow_duplicate_requests
            && self.store.exists_active(input.event_id, requester_user_id).await?
        {
            return Err(GatherlyError::Conflict(
                "You already have an active request for this event".to_string(),
            ));
        }

        let event = self
            .events
            .get_event(input.event_id)
            .await
            .map_err(|e| match e {
                GatewayError::NotFound { .. } => {
                    GatherlyError::EventNotFound { event_id: input.event_id }
                }
                other => GatherlyError::DependencyUnavailable(other.to_string()),
            })?;

        // Hard reject before eligibility even runs
        if event.is_full() {
            return Err(GatherlyError::Conflict("Event is already full".to_string()));
        }

        let requester = self
            .identity
            .get_user(requester_user_id)
            .await
            .map_err(|e| match e {
                GatewayError::NotFound { .. } => {
                    GatherlyError::UserNotFound { user_id: requester_user_id }
                }
                other => GatherlyError::DependencyUnavailable(other.to_string()),
            })?;

        // A requester with no rating history yet simply has no summary
        let rating = match self.trust.get_rating_summary(requester_user_id).await {
            Ok(summary) => summary,
            Err(GatewayError::NotFound { .. }) => RatingSummary {
                user_id: requester_user_id,
                average_rating: None,
                total_ratings: 0,
            },
            Err(other) => return Err(GatherlyError::DependencyUnavailable(other.to_string())),
        };

        let verdict = self.eligibility.evaluate(&event, &requester, &rating);

        let status = if event.auto_approve && verdict.eligible {
            RequestStatus::AutoApproved
        } else {
            RequestStatus::Pending
        };

        let new_request = NewJoinRequest {
            event_id: input.event_id,
            requester_user_id,
            host_user_id: event.host_user_id,
            request_message: input.request_message,
            status,
            requester_rating: verdict.requester_rating,
            event_min_rating: verdict.required_rating,
            is_eligible: verdict.eligible,
            ineligibility_reason: verdict.ineligibility_reason(),
            requester_device_info: input.device_info,
            expires_at: Utc::now() + Duration::days(self.policy.auto_expire_days),
        };

        let saved = self.store.create(new_request).await?;

        if saved.status == RequestStatus::AutoApproved {
            self.run_approval_side_effects(&saved).await;
        } else {
            self.publish(channels::REQUEST_CREATED, created_payload(&saved, &event, &requester))
                .await;
        }

        info!(
            request_id = saved.id,
            status = %saved.status,
            "Join request created"
        );

        Ok(saved)
    }

    /// Approve a pending request as its host
    pub async fn approve_request(
        &self,
        host_user_id: i64,
        request_id: i64,
        response_message: Option<String>,
    ) -> Result<JoinRequest> {
        validate_response_message(&response_message)?;

        let request = self.get_request(request_id).await?;

        if request.host_user_id != host_user_id {
            return Err(GatherlyError::Forbidden(
                "You are not authorized to approve this request".to_string(),
            ));
        }

        let approved = self
            .transition_pending(request_id, RequestStatus::Approved, response_message)
            .await?;

        log_request_transition(request_id, "PENDING", "APPROVED", host_user_id);
        self.run_approval_side_effects(&approved).await;

        Ok(approved)
    }

    /// Decline a pending request as its host
    pub async fn decline_request(
        &self,
        host_user_id: i64,
        request_id: i64,
        response_message: Option<String>,
    ) -> Result<JoinRequest> {
        validate_response_message(&response_message)?;

        let request = self.get_request(request_id).await?;

        if request.host_user_id != host_user_id {
            return Err(GatherlyError::Forbidden(
                "You are not authorized to decline this request".to_string(),
            ));
        }

        let declined = self
            .transition_pending(request_id, RequestStatus::Declined, response_message)
            .await?;

        log_request_transition(request_id, "PENDING", "DECLINED", host_user_id);
        self.publish(channels::REQUEST_DECLINED, basic_payload(&declined)).await;

        Ok(declined)
    }

    /// Cancel a pending request as its requester
    pub async fn cancel_request(
        &self,
        requester_user_id: i64,
        request_id: i64,
    ) -> Result<JoinRequest> {
        let request = self.get_request(request_id).await?;

        if request.requester_user_id != requester_user_id {
            return Err(GatherlyError::Forbidden(
                "You are not authorized to cancel this request".to_string(),
            ));
        }

        let cancelled = self
            .transition_pending(request_id, RequestStatus::Cancelled, None)
            .await?;

        log_request_transition(request_id, "PENDING", "CANCELLED", requester_user_id);
        self.publish(channels::REQUEST_CANCELLED, basic_payload(&cancelled)).await;

        Ok(cancelled)
    }

    /// Approve or decline a batch of requests as their host.
    ///
    /// Validation is all-or-nothing: a single foreign or non-pending target
    /// rejects the whole batch with zero transitions applied. Mutation then
    /// goes through the conditional primitive row by row, so an item that
    /// changed state in between loses its update and is reported in
    /// `skipped` rather than silently ignored.
    pub async fn bulk_respond(
        &self,
        host_user_id: i64,
        input: BulkRespondRequest,
    ) -> Result<BulkRespondOutcome> {
        input.validate().map_err(GatherlyError::InvalidInput)?;

        info!(
            host_user_id = host_user_id,
            count = input.request_ids.len(),
            approved = input.approved,
            "Bulk responding to join requests"
        );

        let requests = self.store.find_by_ids(&input.request_ids).await?;

        if requests.len() != input.request_ids.len() {
            let found: Vec<i64> = requests.iter().map(|r| r.id).collect();
            let missing = input
                .request_ids
                .iter()
                .find(|id| !found.contains(id))
                .copied()
                .unwrap_or_default();
            return Err(GatherlyError::RequestNotFound { request_id: missing });
        }

        if requests.iter().any(|r| r.host_user_id != host_user_id) {
            return Err(GatherlyError::Forbidden(
                "Invalid requests or not authorized".to_string(),
            ));
        }

        if requests.iter().any(|r| r.status != RequestStatus::Pending) {
            return Err(GatherlyError::Conflict(
                "Request is no longer pending".to_string(),
            ));
        }

        let next = if input.approved {
            RequestStatus::Approved
        } else {
            RequestStatus::Declined
        };

        let updated = self
            .store
            .bulk_transition(
                &input.request_ids,
                RequestStatus::Pending,
                next,
                input.response_message.clone(),
                Utc::now(),
            )
            .await?;

        let updated_ids: Vec<i64> = updated.iter().map(|r| r.id).collect();
        let skipped: Vec<i64> = input
            .request_ids
            .iter()
            .filter(|id| !updated_ids.contains(id))
            .copied()
            .collect();

        for id in &skipped {
            warn!(
                request_id = id,
                "Bulk respond target changed state before the update and was skipped"
            );
        }

        for request in &updated {
            if input.approved {
                self.run_approval_side_effects(request).await;
            } else {
                self.publish(channels::REQUEST_DECLINED, basic_payload(request)).await;
            }
        }

        info!(
            updated = updated.len(),
            skipped = skipped.len(),
            "Bulk respond completed"
        );

        Ok(BulkRespondOutcome { updated, skipped })
    }

    /// Get a request by id
    pub async fn get_request(&self, request_id: i64) -> Result<JoinRequest> {
        self.store
            .find_by_id(request_id)
            .await?
            .ok_or(GatherlyError::RequestNotFound { request_id })
    }

    /// Requests sent by a user, newest first
    pub async fn get_sent_requests(
        &self,
        requester_user_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Page<JoinRequest>> {
        self.store.list_by_requester(requester_user_id, page, page_size).await
    }

    /// Requests received by a host, optionally narrowed to one event
    pub async fn get_received_requests(
        &self,
        host_user_id: i64,
        event_id: Option<i64>,
        page: i64,
        page_size: i64,
    ) -> Result<Page<JoinRequest>> {
        self.store.list_by_host(host_user_id, event_id, page, page_size).await
    }

    /// All pending requests awaiting a host's decision
    pub async fn get_pending_requests_for_host(
        &self,
        host_user_id: i64,
    ) -> Result<Vec<JoinRequest>> {
        self.store.list_pending_by_host(host_user_id).await
    }

    /// All requests for an event, newest first
    pub async fn get_requests_for_event(
        &self,
        event_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Page<JoinRequest>> {
        self.store.list_by_event(event_id, page, page_size).await
    }

    /// Aggregate statistics over a requester's sent requests
    pub async fn statistics_for_requester(&self, requester_user_id: i64) -> Result<RequestStatistics> {
        let counts = self.store.status_counts_by_requester(requester_user_id).await?;
        Ok(build_statistics(counts, None))
    }

    /// Aggregate statistics over an event's requests, with the host's
    /// average response time
    pub async fn statistics_for_event(
        &self,
        event_id: i64,
        host_user_id: i64,
    ) -> Result<RequestStatistics> {
        let counts = self.store.status_counts_by_event(event_id).await?;
        let avg = self.store.average_response_time_minutes(host_user_id).await?;
        Ok(build_statistics(counts, avg))
    }

    /// Transition every pending request past its expiry deadline to
    /// EXPIRED. Individual failures are logged and do not abort the sweep.
    pub async fn sweep_expired(&self) -> Result<u64> {
        let expired = self.store.find_expired(Utc::now()).await?;
        let mut processed = 0u64;

        for request in expired {
            match self
                .store
                .transition(
                    request.id,
                    RequestStatus::Pending,
                    RequestStatus::Expired,
                    None,
                    Utc::now(),
                )
                .await
            {
                Ok(Some(updated)) => {
                    processed += 1;
                    log_request_transition(updated.id, "PENDING", "EXPIRED", 0);
                    self.publish(channels::REQUEST_DECLINED, expired_payload(&updated)).await;
                }
                Ok(None) => {
                    // Lost the race to a concurrent host/requester action
                }
                Err(e) => {
                    warn!(request_id = request.id, error = %e, "Failed to expire request");
                }
            }
        }

        info!(processed = processed, "Expired request sweep completed");
        Ok(processed)
    }

    /// Purge terminal requests older than the retention window
    pub async fn purge_old_requests(&self) -> Result<u64> {
        let cutoff = Utc::now() - Duration::days(self.policy.retention_days);
        let purged = self.store.purge_terminal_older_than(cutoff).await?;

        info!(purged = purged, retention_days = self.policy.retention_days, "Old requests purged");
        Ok(purged)
    }

    /// Shared PENDING -> terminal transition with the conflict guard
    async fn transition_pending(
        &self,
        request_id: i64,
        next: RequestStatus,
        response_message: Option<String>,
    ) -> Result<JoinRequest> {
        self.store
            .transition(request_id, RequestStatus::Pending, next, response_message, Utc::now())
            .await?
            .ok_or_else(|| GatherlyError::Conflict("Request is no longer pending".to_string()))
    }

    /// The approval side-effect sequence: add the participant, add the chat
    /// member, announce the approval. The status change is the source of
    /// truth and is already committed; a failing step is logged and the
    /// remaining steps still run, to be reconciled out-of-band.
    async fn run_approval_side_effects(&self, request: &JoinRequest) {
        if let Err(e) = self
            .events
            .add_participant(request.event_id, request.requester_user_id)
            .await
        {
            log_side_effect_failure(request.id, "add_participant", &e.to_string());
        }

        if let Err(e) = self
            .chat
            .add_member_to_event_room(request.event_id, request.requester_user_id)
            .await
        {
            log_side_effect_failure(request.id, "add_chat_member", &e.to_string());
        }

        self.publish(channels::REQUEST_APPROVED, basic_payload(request)).await;
    }

    /// Fire-and-forget notification publish; failures are observability-only
    async fn publish(&self, channel: &str, payload: serde_json::Value) {
        if let Err(e) = self.publisher.publish(channel, payload).await {
            warn!(channel = channel, error = %e, "Failed to publish lifecycle notification");
        }
    }
}

fn validate_response_message(message: &Option<String>) -> Result<()> {
    if let Some(message) = message {
        if message.chars().count() > crate::models::MAX_MESSAGE_LENGTH {
            return Err(GatherlyError::InvalidInput(format!(
                "Response message cannot exceed {} characters",
                crate::models::MAX_MESSAGE_LENGTH
            )));
        }
    }
    Ok(())
}

fn build_statistics(
    counts: HashMap<RequestStatus, i64>,
    average_response_time_minutes: Option<f64>,
) -> RequestStatistics {
    let count = |status: RequestStatus| counts.get(&status).copied().unwrap_or(0);

    let pending = count(RequestStatus::Pending);
    let approved = count(RequestStatus::Approved);
    let auto_approved = count(RequestStatus::AutoApproved);
    let declined = count(RequestStatus::Declined);
    let cancelled = count(RequestStatus::Cancelled);
    let expired = count(RequestStatus::Expired);
    let total = pending + approved + auto_approved + declined + cancelled + expired;

    let approval_rate = if total > 0 {
        (approved + auto_approved) as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    RequestStatistics {
        total_requests: total,
        pending_requests: pending,
        approved_requests: approved,
        auto_approved_requests: auto_approved,
        declined_requests: declined,
        cancelled_requests: cancelled,
        expired_requests: expired,
        approval_rate,
        average_response_time_minutes: average_response_time_minutes.map(|m| m as i64),
    }
}
