//! # Governance Metrics
//!
//! Prometheus metrics for monitoring approvals and account safety state.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! gw-01-guardian-governance = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `governance_approvals_recorded_total` - Approvals recorded (by workflow)
//! - `governance_operations_rejected_total` - Rejected operations (by error kind)
//! - `governance_actions_finalized_total` - Resolved actions (by workflow)
//! - `governance_account_locked` - Whether the account is locked (0/1)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_gauge, register_int_counter_vec, Gauge, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Approvals recorded, labeled by workflow
    pub static ref APPROVALS_RECORDED: IntCounterVec = register_int_counter_vec!(
        "governance_approvals_recorded_total",
        "Total number of approvals recorded",
        &["workflow"]
    )
    .expect("Failed to create APPROVALS_RECORDED metric");

    /// Rejected operations, labeled by error kind
    pub static ref OPERATIONS_REJECTED: IntCounterVec = register_int_counter_vec!(
        "governance_operations_rejected_total",
        "Total number of rejected governance operations",
        &["kind"]
    )
    .expect("Failed to create OPERATIONS_REJECTED metric");

    /// Resolved actions, labeled by workflow
    pub static ref ACTIONS_FINALIZED: IntCounterVec = register_int_counter_vec!(
        "governance_actions_finalized_total",
        "Total number of governance actions resolved",
        &["workflow"]
    )
    .expect("Failed to create ACTIONS_FINALIZED metric");

    /// Account lock flag
    pub static ref ACCOUNT_LOCKED: Gauge = register_gauge!(
        "governance_account_locked",
        "Whether the account is currently locked (0=no, 1=yes)"
    )
    .expect("Failed to create ACCOUNT_LOCKED metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record an approval
#[cfg(feature = "metrics")]
pub fn record_approval_recorded(workflow: &str) {
    APPROVALS_RECORDED.with_label_values(&[workflow]).inc();
}

/// Record a rejected operation
#[cfg(feature = "metrics")]
pub fn record_rejection(kind: &str) {
    OPERATIONS_REJECTED.with_label_values(&[kind]).inc();
}

/// Record a resolved action
#[cfg(feature = "metrics")]
pub fn record_action_finalized(workflow: &str) {
    ACTIONS_FINALIZED.with_label_values(&[workflow]).inc();
}

/// Update the lock gauge
#[cfg(feature = "metrics")]
pub fn set_account_locked(locked: bool) {
    ACCOUNT_LOCKED.set(if locked { 1.0 } else { 0.0 });
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature is disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_approval_recorded(_workflow: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_rejection(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_action_finalized(_workflow: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn set_account_locked(_locked: bool) {}
