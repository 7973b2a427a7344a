//! Eligibility evaluation
//!
//! Pure decision logic: given an event snapshot, the requester profile, and
//! the requester's rating summary, produce a verdict with every violated
//! rule listed. No I/O happens here; determinism matters because the
//! verdict is persisted as part of the request's audit trail.

use tracing::debug;

use crate::models::{EligibilityVerdict, EventSnapshot, RatingSummary, UserSnapshot};

#[derive(Debug, Clone)]
pub struct EligibilityChecker {
    default_min_rating: f64,
}

impl EligibilityChecker {
    pub fn new(default_min_rating: f64) -> Self {
        Self { default_min_rating }
    }

    /// Apply all eligibility rules. Rules are evaluated independently and
    /// never short-circuit, so the requester sees every violation at once.
    pub fn evaluate(
        &self,
        event: &EventSnapshot,
        user: &UserSnapshot,
        rating: &RatingSummary,
    ) -> EligibilityVerdict {
        let mut reasons = Vec::new();
        let mut eligible = true;

        // Rule 1: rating requirement. Only enforced when the effective
        // minimum is positive; a missing user rating counts as 0.0.
        let required_rating = event.min_rating.unwrap_or(self.default_min_rating);
        let user_rating = rating.average_rating.unwrap_or(0.0);

        let mut rating_met = true;
        if required_rating > 0.0 && user_rating < required_rating {
            rating_met = false;
            eligible = false;
            reasons.push(format!(
                "Rating requirement not met. Required: {:.1}, Current: {:.1}",
                required_rating, user_rating
            ));
        }

        // Rule 2: event capacity
        if event.is_full() {
            eligible = false;
            reasons.push("Event is already full".to_string());
        }

        // Rule 3: event-specific custom criteria
        let custom_requirements_met = self.custom_criteria_met(event, user);
        if !custom_requirements_met {
            eligible = false;
            reasons.push("Custom event requirements not met".to_string());
        }

        // Rule 4: hosts cannot join their own event
        if user.id == event.host_user_id {
            eligible = false;
            reasons.push("Host cannot join their own event".to_string());
        }

        debug!(
            user_id = user.id,
            event_id = event.id,
            eligible = eligible,
            "Eligibility evaluated"
        );

        EligibilityVerdict {
            eligible,
            reasons,
            requester_rating: user_rating,
            required_rating,
            rating_met,
            location_met: true,
            custom_requirements_met,
        }
    }

    /// Extensible hook for event-specific structured criteria. Events with
    /// no configured criteria always pass; unrecognized criteria keys are
    /// ignored rather than rejected.
    fn custom_criteria_met(&self, event: &EventSnapshot, _user: &UserSnapshot) -> bool {
        match &event.eligibility_criteria {
            None | Some(serde_json::Value::Null) => true,
            Some(criteria) => {
                debug!(event_id = event.id, criteria = %criteria, "Evaluating custom criteria");
                true
            }
        }
    }
}
