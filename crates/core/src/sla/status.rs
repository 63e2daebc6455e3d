use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::domain::ticket::Ticket;
use crate::errors::SlaError;
use crate::sla::policy::SlaPolicy;

pub const DEFAULT_NEAR_BREACH_THRESHOLD_HOURS: f64 = 4.0;

pub(crate) const MILLIS_PER_MINUTE: i64 = 60_000;
pub(crate) const MILLIS_PER_HOUR: i64 = 3_600_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Normal,
    NearBreach,
    Breached,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::NearBreach => "near-breach",
            Self::Breached => "breached",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of a ticket's SLA. Recomputed on every read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlaStatus {
    pub created_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub elapsed_ms: i64,
    /// Negative once the ticket is past due.
    pub remaining_ms: i64,
    pub percent_consumed: f64,
    pub risk_level: RiskLevel,
}

impl SlaStatus {
    pub fn window_ms(&self) -> i64 {
        (self.due_at - self.created_at).num_milliseconds()
    }

    pub fn is_breached(&self) -> bool {
        self.risk_level == RiskLevel::Breached
    }
}

/// Computes the SLA status of a ticket created at `created_at` with a budget
/// of `sla_hours`, as observed at `now`.
///
/// The result is a pure function of its inputs. Risk is `normal` while no
/// time has been consumed (`now <= created_at`), `breached` once
/// `remaining_ms <= 0`, and `near-breach` when the remaining time is within
/// `near_breach_threshold_hours` (inclusive).
///
/// The window is `sla_hours` rounded to whole milliseconds and must be at
/// least 1 ms long.
pub fn compute_sla_status(
    created_at: DateTime<Utc>,
    sla_hours: f64,
    now: DateTime<Utc>,
    near_breach_threshold_hours: f64,
) -> Result<SlaStatus, SlaError> {
    let window_ms = hours_to_millis(sla_hours)?;

    if !near_breach_threshold_hours.is_finite() || near_breach_threshold_hours < 0.0 {
        return Err(SlaError::InvalidThresholdHours { value: near_breach_threshold_hours });
    }
    // Float to int casts saturate, so an absurdly large threshold just means
    // every open ticket is near breach.
    let threshold_ms = (near_breach_threshold_hours * MILLIS_PER_HOUR as f64).round() as i64;

    let due_at = TimeDelta::try_milliseconds(window_ms)
        .and_then(|window| created_at.checked_add_signed(window))
        .ok_or(SlaError::InvalidSlaHours { value: sla_hours })?;

    let since_created_ms = (now - created_at).num_milliseconds();
    let remaining_ms = (due_at - now).num_milliseconds();
    let elapsed_ms = since_created_ms.clamp(0, window_ms);
    let percent_consumed = (elapsed_ms as f64 / window_ms as f64 * 100.0).clamp(0.0, 100.0);

    let risk_level = if remaining_ms <= 0 {
        RiskLevel::Breached
    } else if since_created_ms <= 0 {
        RiskLevel::Normal
    } else if remaining_ms <= threshold_ms {
        RiskLevel::NearBreach
    } else {
        RiskLevel::Normal
    };

    Ok(SlaStatus { created_at, due_at, elapsed_ms, remaining_ms, percent_consumed, risk_level })
}

fn hours_to_millis(hours: f64) -> Result<i64, SlaError> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(SlaError::InvalidSlaHours { value: hours });
    }

    let millis = (hours * MILLIS_PER_HOUR as f64).round();
    if millis < 1.0 {
        return Err(SlaError::SlaWindowTooShort { value: hours });
    }
    if millis >= i64::MAX as f64 {
        return Err(SlaError::InvalidSlaHours { value: hours });
    }

    Ok(millis as i64)
}

/// Evaluates tickets against an injected clock.
#[derive(Clone, Debug)]
pub struct SlaTracker<C> {
    clock: C,
    near_breach_threshold_hours: f64,
}

impl Default for SlaTracker<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C> SlaTracker<C>
where
    C: Clock,
{
    pub fn new(clock: C) -> Self {
        Self { clock, near_breach_threshold_hours: DEFAULT_NEAR_BREACH_THRESHOLD_HOURS }
    }

    pub fn from_policy(clock: C, policy: &SlaPolicy) -> Self {
        Self::new(clock).with_threshold_hours(policy.near_breach_threshold_hours)
    }

    pub fn with_threshold_hours(mut self, near_breach_threshold_hours: f64) -> Self {
        self.near_breach_threshold_hours = near_breach_threshold_hours;
        self
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn near_breach_threshold_hours(&self) -> f64 {
        self.near_breach_threshold_hours
    }

    /// Computes a status, reading `now` from the clock when it is not given.
    pub fn compute(
        &self,
        created_at: DateTime<Utc>,
        sla_hours: f64,
        now: Option<DateTime<Utc>>,
    ) -> Result<SlaStatus, SlaError> {
        let now = now.unwrap_or_else(|| self.clock.now());
        let result =
            compute_sla_status(created_at, sla_hours, now, self.near_breach_threshold_hours);

        match &result {
            Ok(status) => debug!(
                event_name = "sla.status.computed",
                created_at = %created_at,
                sla_hours,
                remaining_ms = status.remaining_ms,
                risk_level = %status.risk_level,
                "sla status computed"
            ),
            Err(error) => warn!(
                event_name = "sla.status.rejected",
                created_at = %created_at,
                sla_hours,
                error = %error,
                "sla status rejected"
            ),
        }

        result
    }

    pub fn status(&self, ticket: &Ticket) -> Result<SlaStatus, SlaError> {
        self.compute(ticket.created_at, ticket.sla_hours, None)
    }

    pub fn status_at(&self, ticket: &Ticket, now: DateTime<Utc>) -> Result<SlaStatus, SlaError> {
        self.compute(ticket.created_at, ticket.sla_hours, Some(now))
    }
}
