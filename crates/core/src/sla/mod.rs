pub mod escalation;
pub mod format;
pub mod policy;
pub mod snapshot;
pub mod status;
pub mod timestamp;

pub use escalation::{
    allowed_escalation_actions, authorize_escalation, ActionStyle, EscalationAction,
    EscalationDenied, EscalationGate,
};
pub use format::{format_remaining, Locale, PLACEHOLDER};
pub use policy::{SlaPolicy, DEFAULT_SLA_HOURS};
pub use snapshot::SlaSnapshot;
pub use status::{
    compute_sla_status, RiskLevel, SlaStatus, SlaTracker, DEFAULT_NEAR_BREACH_THRESHOLD_HOURS,
};
pub use timestamp::{parse_timestamp, timestamp_from_millis};
