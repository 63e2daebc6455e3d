use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audit::{AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::sla::status::{RiskLevel, SlaStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EscalationAction {
    EscalateRisk,
    EscalateBreach,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStyle {
    Advisory,
    Urgent,
}

impl ActionStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Advisory => "advisory",
            Self::Urgent => "urgent",
        }
    }
}

impl EscalationAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EscalateRisk => "escalate-risk",
            Self::EscalateBreach => "escalate-breach",
        }
    }

    pub fn style(self) -> ActionStyle {
        match self {
            Self::EscalateRisk => ActionStyle::Advisory,
            Self::EscalateBreach => ActionStyle::Urgent,
        }
    }
}

impl std::fmt::Display for EscalationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("escalation `{action}` is not permitted while the ticket is `{risk_level}`")]
pub struct EscalationDenied {
    pub action: EscalationAction,
    pub risk_level: RiskLevel,
}

/// Escalation actions the UI may surface for a ticket in `status`.
pub fn allowed_escalation_actions(status: &SlaStatus) -> BTreeSet<EscalationAction> {
    match status.risk_level {
        RiskLevel::Normal => BTreeSet::new(),
        RiskLevel::NearBreach => BTreeSet::from([EscalationAction::EscalateRisk]),
        RiskLevel::Breached => BTreeSet::from([EscalationAction::EscalateBreach]),
    }
}

pub fn authorize_escalation(
    status: &SlaStatus,
    action: EscalationAction,
) -> Result<(), EscalationDenied> {
    if allowed_escalation_actions(status).contains(&action) {
        return Ok(());
    }

    Err(EscalationDenied { action, risk_level: status.risk_level })
}

/// Authorizes escalation requests and records every decision.
///
/// The gate never triggers the escalation itself; callers invoke the
/// notification/support-ticket mutation only after `authorize` returns `Ok`.
pub struct EscalationGate<S> {
    sink: S,
}

impl<S> EscalationGate<S>
where
    S: AuditSink,
{
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn authorize(
        &self,
        status: &SlaStatus,
        action: EscalationAction,
        audit: &AuditContext,
    ) -> Result<(), EscalationDenied> {
        let result = authorize_escalation(status, action);
        let outcome = match &result {
            Ok(()) => AuditOutcome::Authorized,
            Err(_) => AuditOutcome::Denied,
        };

        self.sink.emit(AuditEvent::escalation(audit, status, action, outcome));

        result
    }
}
