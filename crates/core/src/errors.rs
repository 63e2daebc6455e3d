use thiserror::Error;

use crate::sla::EscalationDenied;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SlaError {
    #[error("sla hours must be a finite number greater than zero, got {value}")]
    InvalidSlaHours { value: f64 },
    #[error("sla hours {value} round to an empty window; the minimum window is 1 ms")]
    SlaWindowTooShort { value: f64 },
    #[error("invalid timestamp for `{field}`: {reason}")]
    InvalidTimestamp { field: &'static str, reason: String },
    #[error("near-breach threshold hours must be a finite number >= 0, got {value}")]
    InvalidThresholdHours { value: f64 },
    #[error("unsupported locale `{value}` (expected en|ar)")]
    UnsupportedLocale { value: String },
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error(transparent)]
    Sla(#[from] SlaError),
    #[error(transparent)]
    EscalationDenied(#[from] EscalationDenied),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl From<SlaError> for ApplicationError {
    fn from(value: SlaError) -> Self {
        Self::Domain(DomainError::Sla(value))
    }
}

impl From<EscalationDenied> for ApplicationError {
    fn from(value: EscalationDenied) -> Self {
        Self::Domain(DomainError::EscalationDenied(value))
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("forbidden: {message}")]
    Forbidden { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The ticket timing data is invalid. The SLA countdown is unavailable."
            }
            Self::Forbidden { .. } => "This escalation is not available for the ticket right now.",
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::Forbidden { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::Forbidden { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(DomainError::Sla(error)) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Domain(DomainError::EscalationDenied(denied)) => Self::Forbidden {
                message: denied.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Domain(DomainError::InvariantViolation(message)) => {
                Self::BadRequest { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}
