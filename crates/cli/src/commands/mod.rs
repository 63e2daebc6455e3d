pub mod config;
pub mod escalate;
pub mod status;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tawqit_core::config::{AppConfig, LoadOptions};
use tawqit_core::errors::{ApplicationError, InterfaceError};
use tawqit_core::sla::parse_timestamp;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;
pub const EXIT_ESCALATION_DENIED: u8 = 4;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success_with(command: &str, message: impl Into<String>, data: Option<Value>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::failure_with(command, error_class, message, exit_code, None)
    }

    pub fn failure_with(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Maps an application error through the interface layer so the payload
    /// carries the same classification a request handler would return.
    pub fn from_application_error(
        command: &str,
        error: ApplicationError,
        correlation_id: &str,
    ) -> Self {
        Self::from_application_error_with(command, error, correlation_id, None)
    }

    /// Like [`CommandResult::from_application_error`], attaching `data` so a
    /// caller can still render a fallback view.
    pub fn from_application_error_with(
        command: &str,
        error: ApplicationError,
        correlation_id: &str,
        data: Option<Value>,
    ) -> Self {
        let detail = error.to_string();
        let interface = error.into_interface(correlation_id);
        let (error_class, exit_code) = match interface {
            InterfaceError::BadRequest { .. } => ("invalid_input", EXIT_INVALID_INPUT),
            InterfaceError::Forbidden { .. } => ("escalation_denied", EXIT_ESCALATION_DENIED),
            InterfaceError::Internal { .. } => ("config_validation", EXIT_CONFIG),
        };

        Self::failure_with(
            command,
            error_class,
            format!("{} ({detail})", interface.user_message()),
            exit_code,
            data,
        )
    }
}

pub(crate) fn load_config(command: &str, correlation_id: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::from_application_error(
            command,
            ApplicationError::Configuration(error.to_string()),
            correlation_id,
        )
    })
}

pub(crate) fn parse_instant(
    command: &str,
    field: &'static str,
    raw: &str,
    correlation_id: &str,
) -> Result<DateTime<Utc>, CommandResult> {
    parse_timestamp(field, raw).map_err(|error| {
        CommandResult::from_application_error(command, error.into(), correlation_id)
    })
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
