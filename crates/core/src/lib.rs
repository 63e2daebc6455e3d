pub mod audit;
pub mod clock;
pub mod config;
pub mod domain;
pub mod errors;
pub mod sla;

pub use audit::{AuditContext, AuditEvent, AuditOutcome, AuditSink};
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::ticket::{Ticket, TicketId};
pub use errors::{ApplicationError, DomainError, InterfaceError, SlaError};
pub use sla::{
    allowed_escalation_actions, authorize_escalation, compute_sla_status, format_remaining,
    EscalationAction, EscalationDenied, EscalationGate, Locale, RiskLevel, SlaPolicy, SlaSnapshot,
    SlaStatus, SlaTracker,
};
