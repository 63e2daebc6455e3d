use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SlaError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketId(pub String);

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The slice of a consultation ticket the SLA tracker cares about.
///
/// `created_at` and `sla_hours` are fixed at creation. If an operator later
/// changes `sla_hours`, the next status read simply recomputes from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub created_at: DateTime<Utc>,
    pub sla_hours: f64,
}

impl Ticket {
    pub fn new(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        sla_hours: f64,
    ) -> Result<Self, SlaError> {
        if !sla_hours.is_finite() || sla_hours <= 0.0 {
            return Err(SlaError::InvalidSlaHours { value: sla_hours });
        }

        Ok(Self { id: TicketId(id.into()), created_at, sla_hours })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::Ticket;
    use crate::errors::SlaError;

    #[test]
    fn accepts_positive_fractional_hours() {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let ticket = Ticket::new("CONS-1001", created_at, 1.5).expect("valid ticket");

        assert_eq!(ticket.id.to_string(), "CONS-1001");
        assert_eq!(ticket.sla_hours, 1.5);
    }

    #[test]
    fn rejects_non_positive_and_non_finite_hours() {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        for hours in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let error = Ticket::new("CONS-1002", created_at, hours).expect_err("invalid hours");
            assert!(matches!(error, SlaError::InvalidSlaHours { .. }));
        }
    }
}
