//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod request;
pub mod eligibility;
pub mod remote;

// Re-export commonly used models
pub use request::{
    JoinRequest, RequestStatus, CreateJoinRequest, NewJoinRequest,
    BulkRespondRequest, BulkRespondOutcome, RequestStatistics, Page,
    MAX_MESSAGE_LENGTH, MAX_DEVICE_INFO_LENGTH,
};
pub use eligibility::EligibilityVerdict;
pub use remote::{EventSnapshot, UserSnapshot, RatingSummary};
