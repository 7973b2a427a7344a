//! Service layer
//!
//! Business logic for the join request lifecycle: eligibility evaluation,
//! the request orchestrator, lifecycle notification publishing, and the
//! background maintenance scheduler.

pub mod eligibility;
pub mod publisher;
pub mod request;
pub mod scheduler;

pub use eligibility::EligibilityChecker;
pub use publisher::{NotificationPublisher, RedisEventPublisher};
pub use request::RequestService;
pub use scheduler::Scheduler;
