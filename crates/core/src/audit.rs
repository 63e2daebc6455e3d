use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ticket::TicketId;
use crate::sla::escalation::{ActionStyle, EscalationAction};
use crate::sla::status::{RiskLevel, SlaStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Authorized,
    Denied,
}

impl AuditOutcome {
    pub fn event_type(self) -> &'static str {
        match self {
            Self::Authorized => "escalation.authorized",
            Self::Denied => "escalation.denied",
        }
    }
}

/// Who asked for an escalation, on which ticket, under which request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditContext {
    pub ticket_id: TicketId,
    pub correlation_id: String,
    pub actor: String,
}

impl AuditContext {
    pub fn new(
        ticket_id: TicketId,
        correlation_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self { ticket_id, correlation_id: correlation_id.into(), actor: actor.into() }
    }
}

/// One escalation decision together with the SLA reading it was based on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: String,
    pub event_type: String,
    pub ticket_id: TicketId,
    pub correlation_id: String,
    pub actor: String,
    pub action: EscalationAction,
    pub style: ActionStyle,
    pub outcome: AuditOutcome,
    pub risk_level: RiskLevel,
    pub remaining_ms: i64,
    pub percent_consumed: f64,
    pub due_at: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn escalation(
        context: &AuditContext,
        status: &SlaStatus,
        action: EscalationAction,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            event_type: outcome.event_type().to_owned(),
            ticket_id: context.ticket_id.clone(),
            correlation_id: context.correlation_id.clone(),
            actor: context.actor.clone(),
            action,
            style: action.style(),
            outcome,
            risk_level: status.risk_level,
            remaining_ms: status.remaining_ms,
            percent_consumed: status.percent_consumed,
            due_at: status.due_at,
            occurred_at: Utc::now(),
        }
    }
}

pub trait AuditSink: Send + Sync {
    fn emit(&self, event: AuditEvent);
}

impl<S> AuditSink for &S
where
    S: AuditSink + ?Sized,
{
    fn emit(&self, event: AuditEvent) {
        (**self).emit(event);
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl InMemoryAuditSink {
    pub fn events(&self) -> Vec<AuditEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for InMemoryAuditSink {
    fn emit(&self, event: AuditEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Forwards escalation decisions to the `tracing` pipeline.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, event: AuditEvent) {
        tracing::info!(
            event_name = %event.event_type,
            event_id = %event.event_id,
            correlation_id = %event.correlation_id,
            ticket_id = %event.ticket_id,
            actor = %event.actor,
            action = %event.action,
            style = event.style.as_str(),
            risk_level = %event.risk_level,
            remaining_ms = event.remaining_ms,
            due_at = %event.due_at,
            "escalation decision recorded"
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::audit::{AuditContext, AuditEvent, AuditOutcome, AuditSink, InMemoryAuditSink};
    use crate::domain::ticket::TicketId;
    use crate::sla::escalation::{ActionStyle, EscalationAction};
    use crate::sla::status::{compute_sla_status, RiskLevel};

    fn context() -> AuditContext {
        AuditContext::new(TicketId("CONS-2024-0042".to_owned()), "req-123", "consultant-17")
    }

    #[test]
    fn escalation_event_captures_the_sla_reading_behind_the_decision() {
        let status = compute_sla_status(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            24.0,
            Utc.with_ymd_and_hms(2024, 1, 1, 21, 0, 0).unwrap(),
            4.0,
        )
        .expect("valid status");

        let event = AuditEvent::escalation(
            &context(),
            &status,
            EscalationAction::EscalateRisk,
            AuditOutcome::Authorized,
        );

        assert_eq!(event.event_type, "escalation.authorized");
        assert_eq!(event.ticket_id, TicketId("CONS-2024-0042".to_owned()));
        assert_eq!(event.actor, "consultant-17");
        assert_eq!(event.style, ActionStyle::Advisory);
        assert_eq!(event.risk_level, RiskLevel::NearBreach);
        assert_eq!(event.remaining_ms, 3 * 3_600_000);
        assert_eq!(event.percent_consumed, 87.5);
        assert_eq!(event.due_at, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
        assert!(!event.event_id.is_empty());
    }

    #[test]
    fn in_memory_sink_keeps_decisions_in_order() {
        let status = compute_sla_status(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            24.0,
            Utc.with_ymd_and_hms(2024, 1, 2, 1, 0, 0).unwrap(),
            4.0,
        )
        .expect("valid status");
        let sink = InMemoryAuditSink::default();

        sink.emit(AuditEvent::escalation(
            &context(),
            &status,
            EscalationAction::EscalateRisk,
            AuditOutcome::Denied,
        ));
        (&sink).emit(AuditEvent::escalation(
            &context(),
            &status,
            EscalationAction::EscalateBreach,
            AuditOutcome::Authorized,
        ));

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "escalation.denied");
        assert_eq!(events[0].risk_level, RiskLevel::Breached);
        assert_eq!(events[1].action, EscalationAction::EscalateBreach);
        assert_eq!(events[1].remaining_ms, -3_600_000);
    }

    #[test]
    fn outcomes_serialize_as_snake_case() {
        let encoded = serde_json::to_string(&AuditOutcome::Denied).expect("serialize");
        assert_eq!(encoded, "\"denied\"");
    }
}
