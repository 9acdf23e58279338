//! Context model.
//!
//! # Data Flow
//! ```text
//! logger base context + call context
//!     → model.rs (merge_context, right-biased, metadata deep-merged)
//!     → model.rs (normalize_context, drop empty decoration)
//!     → masking.rs (mask_sensitive_data, reduce ip / user agent)
//!     → serialized onto the tracing event
//! ```
//!
//! # Design Decisions
//! - Pure functions only; nothing here can fail or panic on odd input
//! - Unknown keys are carried as JSON extension fields, never rejected

pub mod masking;
pub mod model;

pub use masking::mask_sensitive_data;
pub use model::{
    create_academic_context, create_performance_context, create_request_context,
    create_school_context, create_user_context, merge_context, normalize_context, LogContext,
    UserRole,
};
