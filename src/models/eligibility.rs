//! Eligibility verdict model
//!
//! The verdict is computed fresh on every request creation and folded into
//! the persisted request as an immutable audit snapshot.

use serde::{Deserialize, Serialize};

/// Result of applying the eligibility rules to a join attempt.
///
/// Every failing rule appends a reason; the verdict is never
/// short-circuited, so a caller sees all violations at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityVerdict {
    pub eligible: bool,
    pub reasons: Vec<String>,
    pub requester_rating: f64,
    pub required_rating: f64,
    pub rating_met: bool,
    pub location_met: bool,
    pub custom_requirements_met: bool,
}

impl EligibilityVerdict {
    /// Human-readable reason string persisted on ineligible requests
    pub fn ineligibility_reason(&self) -> Option<String> {
        if self.eligible {
            None
        } else {
            Some(self.reasons.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligible_verdict_has_no_reason() {
        let verdict = EligibilityVerdict {
            eligible: true,
            reasons: vec![],
            requester_rating: 4.5,
            required_rating: 4.0,
            rating_met: true,
            location_met: true,
            custom_requirements_met: true,
        };
        assert_eq!(verdict.ineligibility_reason(), None);
    }

    #[test]
    fn test_reasons_are_joined_in_order() {
        let verdict = EligibilityVerdict {
            eligible: false,
            reasons: vec!["first".to_string(), "second".to_string()],
            requester_rating: 0.0,
            required_rating: 4.0,
            rating_met: false,
            location_met: true,
            custom_requirements_met: true,
        };
        assert_eq!(verdict.ineligibility_reason().unwrap(), "first, second");
    }
}
