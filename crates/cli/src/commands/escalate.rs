use clap::{Args, ValueEnum};
use serde_json::json;
use tawqit_core::audit::{AuditContext, AuditSink, InMemoryAuditSink, TracingAuditSink};
use tawqit_core::clock::SystemClock;
use tawqit_core::domain::ticket::TicketId;
use tawqit_core::errors::DomainError;
use tawqit_core::sla::{EscalationAction, EscalationGate, SlaTracker};
use uuid::Uuid;

use super::{load_config, parse_instant, CommandResult};

const COMMAND: &str = "escalate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    EscalateRisk,
    EscalateBreach,
}

impl From<ActionArg> for EscalationAction {
    fn from(value: ActionArg) -> Self {
        match value {
            ActionArg::EscalateRisk => Self::EscalateRisk,
            ActionArg::EscalateBreach => Self::EscalateBreach,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct EscalateArgs {
    #[arg(long, help = "Ticket or booking identifier")]
    pub ticket_id: String,
    #[arg(long, value_enum, help = "Escalation action requested by the user")]
    pub action: ActionArg,
    #[arg(long, help = "Ticket creation time (RFC 3339 or epoch milliseconds)")]
    pub created_at: String,
    #[arg(long, help = "SLA budget in hours; overrides the consultation type default")]
    pub sla_hours: Option<f64>,
    #[arg(long, help = "Consultation type used to look up the configured SLA budget")]
    pub consultation_type: Option<String>,
    #[arg(long, help = "Evaluate at this instant instead of the current time")]
    pub now: Option<String>,
    #[arg(long, default_value = "cli", help = "Actor recorded in the audit trail")]
    pub actor: String,
}

pub fn run(args: &EscalateArgs) -> CommandResult {
    let correlation_id = Uuid::new_v4().to_string();
    if args.ticket_id.trim().is_empty() {
        return CommandResult::from_application_error(
            COMMAND,
            DomainError::InvariantViolation("ticket id must not be empty".to_owned()).into(),
            &correlation_id,
        );
    }

    let config = match load_config(COMMAND, &correlation_id) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let created_at = match parse_instant(COMMAND, "created_at", &args.created_at, &correlation_id)
    {
        Ok(created_at) => created_at,
        Err(failure) => return failure,
    };
    let now = match args.now.as_deref() {
        Some(raw) => match parse_instant(COMMAND, "now", raw, &correlation_id) {
            Ok(now) => Some(now),
            Err(failure) => return failure,
        },
        None => None,
    };

    let tracker = SlaTracker::from_policy(SystemClock, &config.sla);
    let status = match config
        .sla
        .hours_for(args.consultation_type.as_deref(), args.sla_hours)
        .and_then(|sla_hours| tracker.compute(created_at, sla_hours, now))
    {
        Ok(status) => status,
        Err(error) => {
            return CommandResult::from_application_error(COMMAND, error.into(), &correlation_id)
        }
    };

    let action = EscalationAction::from(args.action);
    let audit = AuditContext::new(
        TicketId(args.ticket_id.clone()),
        correlation_id.clone(),
        args.actor.clone(),
    );
    let gate = EscalationGate::new(InMemoryAuditSink::default());
    let decision = gate.authorize(&status, action, &audit);

    let events = gate.sink().events();
    for event in &events {
        TracingAuditSink.emit(event.clone());
    }

    match decision {
        Ok(()) => CommandResult::success_with(
            COMMAND,
            format!("{action} authorized for ticket {}", args.ticket_id),
            Some(json!({
                "correlation_id": correlation_id,
                "action": action,
                "style": action.style(),
                "risk_level": status.risk_level,
                "remaining_ms": status.remaining_ms,
                "audit": events,
            })),
        ),
        Err(denied) => {
            CommandResult::from_application_error(COMMAND, denied.into(), &correlation_id)
        }
    }
}
