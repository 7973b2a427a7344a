//! Join request repository implementation

use std::collections::HashMap;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::store::RequestStore;
use crate::models::{JoinRequest, NewJoinRequest, Page, RequestStatus};
use crate::utils::errors::Result;

const COLUMNS: &str = "id, event_id, requester_user_id, host_user_id, request_message, status, \
     response_message, requester_rating, event_min_rating, is_eligible, ineligibility_reason, \
     requester_device_info, requested_at, responded_at, expires_at";

#[derive(Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestStore for RequestRepository {
    async fn create(&self, new_request: NewJoinRequest) -> Result<JoinRequest> {
        let request = sqlx::query_as::<_, JoinRequest>(&format!(
            r#"
            INSERT INTO join_requests
                (event_id, requester_user_id, host_user_id, request_message, status,
                 requester_rating, event_min_rating, is_eligible, ineligibility_reason,
                 requester_device_info, requested_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new_request.event_id)
        .bind(new_request.requester_user_id)
        .bind(new_request.host_user_id)
        .bind(new_request.request_message)
        .bind(new_request.status)
        .bind(new_request.requester_rating)
        .bind(new_request.event_min_rating)
        .bind(new_request.is_eligible)
        .bind(new_request.ineligibility_reason)
        .bind(new_request.requester_device_info)
        .bind(Utc::now())
        .bind(new_request.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<JoinRequest>> {
        let request = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {COLUMNS} FROM join_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn find_by_event_and_requester(
        &self,
        event_id: i64,
        requester_user_id: i64,
    ) -> Result<Option<JoinRequest>> {
        let request = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {COLUMNS} FROM join_requests \
             WHERE event_id = $1 AND requester_user_id = $2 \
             ORDER BY requested_at DESC LIMIT 1"
        ))
        .bind(event_id)
        .bind(requester_user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn exists_active(&self, event_id: i64, requester_user_id: i64) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM join_requests \
             WHERE event_id = $1 AND requester_user_id = $2 \
             AND status IN ('PENDING', 'APPROVED', 'AUTO_APPROVED')",
        )
        .bind(event_id)
        .bind(requester_user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    async fn count_pending_by_requester(&self, requester_user_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM join_requests \
             WHERE requester_user_id = $1 AND status = 'PENDING'",
        )
        .bind(requester_user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    async fn list_by_requester(
        &self,
        requester_user_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Page<JoinRequest>> {
        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM join_requests WHERE requester_user_id = $1")
                .bind(requester_user_id)
                .fetch_one(&self.pool)
                .await?;

        let items = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {COLUMNS} FROM join_requests WHERE requester_user_id = $1 \
             ORDER BY requested_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(requester_user_id)
        .bind(page_size)
        .bind(page * page_size)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, page, page_size, total.0))
    }

    async fn list_by_host(
        &self,
        host_user_id: i64,
        event_id: Option<i64>,
        page: i64,
        page_size: i64,
    ) -> Result<Page<JoinRequest>> {
        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM join_requests \
             WHERE host_user_id = $1 AND ($2::BIGINT IS NULL OR event_id = $2)",
        )
        .bind(host_user_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {COLUMNS} FROM join_requests \
             WHERE host_user_id = $1 AND ($2::BIGINT IS NULL OR event_id = $2) \
             ORDER BY requested_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(host_user_id)
        .bind(event_id)
        .bind(page_size)
        .bind(page * page_size)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, page, page_size, total.0))
    }

    async fn list_by_event(
        &self,
        event_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Page<JoinRequest>> {
        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM join_requests WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(&self.pool)
                .await?;

        let items = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {COLUMNS} FROM join_requests WHERE event_id = $1 \
             ORDER BY requested_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(event_id)
        .bind(page_size)
        .bind(page * page_size)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, page, page_size, total.0))
    }

    async fn list_pending_by_host(&self, host_user_id: i64) -> Result<Vec<JoinRequest>> {
        let requests = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {COLUMNS} FROM join_requests \
             WHERE host_user_id = $1 AND status = 'PENDING' \
             ORDER BY requested_at DESC"
        ))
        .bind(host_user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<JoinRequest>> {
        let requests = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {COLUMNS} FROM join_requests WHERE id = ANY($1) \
             ORDER BY requested_at DESC"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn transition(
        &self,
        id: i64,
        expected: RequestStatus,
        next: RequestStatus,
        response_message: Option<String>,
        responded_at: DateTime<Utc>,
    ) -> Result<Option<JoinRequest>> {
        // The status guard makes this a compare-and-swap: of two racing
        // transitions, exactly one sees an affected row.
        let request = sqlx::query_as::<_, JoinRequest>(&format!(
            r#"
            UPDATE join_requests
            SET status = $2,
                response_message = COALESCE($3, response_message),
                responded_at = $4
            WHERE id = $1 AND status = $5
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(next)
        .bind(response_message)
        .bind(responded_at)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn bulk_transition(
        &self,
        ids: &[i64],
        expected: RequestStatus,
        next: RequestStatus,
        response_message: Option<String>,
        responded_at: DateTime<Utc>,
    ) -> Result<Vec<JoinRequest>> {
        let requests = sqlx::query_as::<_, JoinRequest>(&format!(
            r#"
            UPDATE join_requests
            SET status = $2,
                response_message = COALESCE($3, response_message),
                responded_at = $4
            WHERE id = ANY($1) AND status = $5
            RETURNING {COLUMNS}
            "#
        ))
        .bind(ids)
        .bind(next)
        .bind(response_message)
        .bind(responded_at)
        .bind(expected)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn status_counts_by_requester(
        &self,
        requester_user_id: i64,
    ) -> Result<HashMap<RequestStatus, i64>> {
        let rows: Vec<(RequestStatus, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM join_requests \
             WHERE requester_user_id = $1 GROUP BY status",
        )
        .bind(requester_user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn status_counts_by_event(&self, event_id: i64) -> Result<HashMap<RequestStatus, i64>> {
        let rows: Vec<(RequestStatus, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM join_requests \
             WHERE event_id = $1 GROUP BY status",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn average_response_time_minutes(&self, host_user_id: i64) -> Result<Option<f64>> {
        let avg: (Option<f64>,) = sqlx::query_as(
            "SELECT CAST(AVG(EXTRACT(EPOCH FROM (responded_at - requested_at))) AS DOUBLE PRECISION) / 60.0 \
             FROM join_requests \
             WHERE host_user_id = $1 AND responded_at IS NOT NULL",
        )
        .bind(host_user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(avg.0)
    }

    async fn find_expired(&self, now: DateTime<Utc>) -> Result<Vec<JoinRequest>> {
        let requests = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {COLUMNS} FROM join_requests \
             WHERE status = 'PENDING' AND expires_at < $1 \
             ORDER BY requested_at ASC"
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn purge_terminal_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM join_requests \
             WHERE requested_at < $1 \
             AND status NOT IN ('PENDING', 'APPROVED', 'AUTO_APPROVED')",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
