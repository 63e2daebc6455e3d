use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ticket::Ticket;
use crate::errors::SlaError;
use crate::sla::status::DEFAULT_NEAR_BREACH_THRESHOLD_HOURS;

pub const DEFAULT_SLA_HOURS: f64 = 24.0;

/// SLA budgets per consultation type plus the near-breach warning window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlaPolicy {
    pub default_hours: f64,
    pub near_breach_threshold_hours: f64,
    #[serde(default)]
    pub consultation_hours: BTreeMap<String, f64>,
}

impl Default for SlaPolicy {
    fn default() -> Self {
        Self {
            default_hours: DEFAULT_SLA_HOURS,
            near_breach_threshold_hours: DEFAULT_NEAR_BREACH_THRESHOLD_HOURS,
            consultation_hours: BTreeMap::new(),
        }
    }
}

impl SlaPolicy {
    pub fn with_consultation_hours(mut self, consultation_type: &str, hours: f64) -> Self {
        self.consultation_hours.insert(normalize_key(consultation_type), hours);
        self
    }

    /// Resolves the SLA budget for a new ticket: an explicit override wins,
    /// then the consultation type's default, then the policy default.
    pub fn hours_for(
        &self,
        consultation_type: Option<&str>,
        override_hours: Option<f64>,
    ) -> Result<f64, SlaError> {
        let hours = override_hours
            .or_else(|| {
                consultation_type
                    .and_then(|kind| self.consultation_hours.get(&normalize_key(kind)).copied())
            })
            .unwrap_or(self.default_hours);

        if !hours.is_finite() || hours <= 0.0 {
            return Err(SlaError::InvalidSlaHours { value: hours });
        }

        Ok(hours)
    }

    pub fn ticket(
        &self,
        id: impl Into<String>,
        consultation_type: Option<&str>,
        created_at: DateTime<Utc>,
        override_hours: Option<f64>,
    ) -> Result<Ticket, SlaError> {
        let hours = self.hours_for(consultation_type, override_hours)?;
        Ticket::new(id, created_at, hours)
    }

    pub fn validate(&self) -> Result<(), SlaError> {
        if !self.default_hours.is_finite() || self.default_hours <= 0.0 {
            return Err(SlaError::InvalidSlaHours { value: self.default_hours });
        }

        if !self.near_breach_threshold_hours.is_finite() || self.near_breach_threshold_hours < 0.0
        {
            return Err(SlaError::InvalidThresholdHours {
                value: self.near_breach_threshold_hours,
            });
        }

        if let Some(hours) = self
            .consultation_hours
            .values()
            .copied()
            .find(|hours| !hours.is_finite() || *hours <= 0.0)
        {
            return Err(SlaError::InvalidSlaHours { value: hours });
        }

        Ok(())
    }
}

pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|ch| if ch == '-' || ch.is_whitespace() { '_' } else { ch })
        .collect()
}
