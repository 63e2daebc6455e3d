use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::SlaError;
use crate::sla::escalation::{allowed_escalation_actions, EscalationAction};
use crate::sla::format::{format_remaining, Locale, PLACEHOLDER};
use crate::sla::status::{RiskLevel, SlaStatus};

/// Everything a dashboard needs to render one ticket's countdown.
///
/// Built from the tracker's result so that bad timing data degrades to the
/// neutral placeholder with no escalation controls instead of a guessed SLA.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlaSnapshot {
    pub status: Option<SlaStatus>,
    pub label: String,
    pub percent_consumed: Option<f64>,
    pub risk_level: Option<RiskLevel>,
    pub actions: BTreeSet<EscalationAction>,
    pub error: Option<String>,
}

impl SlaSnapshot {
    pub fn from_status(status: SlaStatus, locale: Locale) -> Self {
        Self {
            label: format_remaining(&status, locale),
            percent_consumed: Some(status.percent_consumed),
            risk_level: Some(status.risk_level),
            actions: allowed_escalation_actions(&status),
            status: Some(status),
            error: None,
        }
    }

    pub fn unavailable(error: &SlaError) -> Self {
        warn!(
            event_name = "sla.snapshot.unavailable",
            error = %error,
            "sla countdown unavailable, rendering placeholder"
        );

        Self {
            status: None,
            label: PLACEHOLDER.to_owned(),
            percent_consumed: None,
            risk_level: None,
            actions: BTreeSet::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status.is_some()
    }
}
