use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use tawqit_cli::commands::escalate::{ActionArg, EscalateArgs};
use tawqit_cli::commands::status::StatusArgs;
use tawqit_cli::commands::{config, escalate, status};
use tawqit_cli::logging::resolve_logging_config;
use tawqit_core::config::LogFormat;

fn status_args(created_at: &str, sla_hours: Option<f64>, now: &str) -> StatusArgs {
    StatusArgs {
        created_at: created_at.to_string(),
        sla_hours,
        now: Some(now.to_string()),
        ..StatusArgs::default()
    }
}

fn escalate_args(action: ActionArg, now: &str) -> EscalateArgs {
    EscalateArgs {
        ticket_id: "CONS-2024-0001".to_string(),
        action,
        created_at: "2024-01-01T00:00:00Z".to_string(),
        sla_hours: Some(24.0),
        consultation_type: None,
        now: Some(now.to_string()),
        actor: "consultant-42".to_string(),
    }
}

#[test]
fn status_reports_halfway_ticket_as_normal() {
    with_env(&[], || {
        let result =
            status::run(&status_args("2024-01-01T00:00:00Z", Some(24.0), "2024-01-01T12:00:00Z"));
        assert_eq!(result.exit_code, 0, "expected successful status run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "status");
        assert_eq!(payload["status"], "ok");

        let snapshot = &payload["data"]["snapshot"];
        assert_eq!(snapshot["risk_level"], "normal");
        assert_eq!(snapshot["percent_consumed"], 50.0);
        assert_eq!(snapshot["label"], "12 hours 0 minutes");
        assert_eq!(snapshot["status"]["remaining_ms"], 43_200_000);
        assert_eq!(snapshot["actions"], serde_json::json!([]));
    });
}

#[test]
fn status_accepts_epoch_millis_and_arabic_locale() {
    with_env(&[], || {
        let mut args = status_args("1704067200000", Some(24.0), "2024-01-01T21:00:00Z");
        args.locale = Some("ar".to_string());

        let result = status::run(&args);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let snapshot = &payload["data"]["snapshot"];
        assert_eq!(snapshot["risk_level"], "near-breach");
        assert_eq!(snapshot["label"], "٣ ساعة ٠ دقيقة");
        assert_eq!(snapshot["actions"], serde_json::json!(["escalate-risk"]));
    });
}

#[test]
fn status_uses_configured_default_hours_and_threshold() {
    with_env(
        &[("TAWQIT_SLA_DEFAULT_HOURS", "10"), ("TAWQIT_SLA_NEAR_BREACH_THRESHOLD_HOURS", "6")],
        || {
            let result =
                status::run(&status_args("2024-01-01T00:00:00Z", None, "2024-01-01T05:00:00Z"));
            assert_eq!(result.exit_code, 0);

            let payload = parse_payload(&result.output);
            assert_eq!(payload["data"]["sla_hours"], 10.0);
            assert_eq!(payload["data"]["snapshot"]["risk_level"], "near-breach");
        },
    );
}

#[test]
fn status_rejects_non_positive_sla_hours() {
    with_env(&[], || {
        let result =
            status::run(&status_args("2024-01-01T00:00:00Z", Some(0.0), "2024-01-01T05:00:00Z"));
        assert_eq!(result.exit_code, 3, "expected invalid input code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_input");
        assert!(payload["message"].as_str().unwrap_or_default().contains("sla hours"));

        let snapshot = &payload["data"]["snapshot"];
        assert_eq!(snapshot["label"], "—");
        assert_eq!(snapshot["status"], Value::Null);
        assert_eq!(snapshot["risk_level"], Value::Null);
        assert_eq!(snapshot["actions"], serde_json::json!([]));
        assert!(snapshot["error"].as_str().unwrap_or_default().contains("sla hours"));
    });
}

#[test]
fn status_rejects_unparseable_timestamps() {
    with_env(&[], || {
        let result = status::run(&status_args("not-a-date", Some(24.0), "2024-01-01T05:00:00Z"));
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_input");
        assert!(payload["message"].as_str().unwrap_or_default().contains("created_at"));
        assert_eq!(payload["data"]["snapshot"]["label"], "—");
    });
}

#[test]
fn status_reports_sub_millisecond_window_as_invalid_input() {
    with_env(&[], || {
        let result =
            status::run(&status_args("2024-01-01T00:00:00Z", Some(1e-7), "2024-01-01T00:00:00Z"));
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_input");
        let message = payload["message"].as_str().unwrap_or_default();
        assert!(message.contains("minimum window is 1 ms"), "unexpected message: {message}");
        assert_eq!(payload["data"]["snapshot"]["label"], "—");
    });
}

#[test]
fn status_reports_config_failure() {
    with_env(&[("TAWQIT_LOGGING_LEVEL", "loud")], || {
        let result =
            status::run(&status_args("2024-01-01T00:00:00Z", Some(24.0), "2024-01-01T05:00:00Z"));
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn escalate_authorizes_breach_escalation_for_breached_ticket() {
    with_env(&[], || {
        let result =
            escalate::run(&escalate_args(ActionArg::EscalateBreach, "2024-01-02T01:00:00Z"));
        assert_eq!(result.exit_code, 0, "expected authorized escalation");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "escalate");
        assert_eq!(payload["data"]["action"], "escalate-breach");
        assert_eq!(payload["data"]["style"], "urgent");
        assert_eq!(payload["data"]["risk_level"], "breached");
        assert_eq!(payload["data"]["remaining_ms"], -3_600_000);
        assert_eq!(payload["data"]["audit"][0]["event_type"], "escalation.authorized");
        assert_eq!(payload["data"]["audit"][0]["ticket_id"], "CONS-2024-0001");
    });
}

#[test]
fn escalate_denies_risk_escalation_for_normal_ticket() {
    with_env(&[], || {
        let result =
            escalate::run(&escalate_args(ActionArg::EscalateRisk, "2024-01-01T12:00:00Z"));
        assert_eq!(result.exit_code, 4, "expected escalation denied code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "escalation_denied");
        assert!(payload["message"].as_str().unwrap_or_default().contains("normal"));
    });
}

#[test]
fn escalate_rejects_blank_ticket_id() {
    with_env(&[], || {
        let mut args = escalate_args(ActionArg::EscalateBreach, "2024-01-02T01:00:00Z");
        args.ticket_id = "   ".to_string();

        let result = escalate::run(&args);
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_input");
        assert!(payload["message"].as_str().unwrap_or_default().contains("ticket id"));
    });
}

#[test]
fn config_reports_env_sources() {
    with_env(&[("TAWQIT_LOG_LEVEL", "debug"), ("TAWQIT_DISPLAY_LOCALE", "ar")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "ok");
        assert!(payload["message"].as_str().unwrap_or_default().starts_with("effective config"));

        let entries = payload["data"]["entries"].as_array().cloned().unwrap_or_default();
        let entry = |key: &str| {
            entries.iter().find(|entry| entry["key"] == key).cloned().unwrap_or(Value::Null)
        };

        assert_eq!(entry("logging.level")["value"], "debug");
        assert_eq!(entry("logging.level")["source"], "env (TAWQIT_LOG_LEVEL)");
        assert_eq!(entry("logging.format")["value"], "compact");
        assert_eq!(entry("display.locale")["value"], "ar");
        assert_eq!(entry("display.locale")["source"], "env (TAWQIT_DISPLAY_LOCALE)");
        assert_eq!(entry("sla.near_breach_threshold_hours")["value"], "4");
        assert_eq!(entry("sla.near_breach_threshold_hours")["source"], "default");
    });
}

#[test]
fn config_reports_invalid_configuration() {
    with_env(&[("TAWQIT_LOGGING_LEVEL", "loud")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
        assert!(payload["message"].as_str().unwrap_or_default().contains("logging.level"));
    });
}

#[test]
fn logging_falls_back_to_defaults_when_config_is_invalid() {
    with_env(&[("TAWQIT_LOGGING_LEVEL", "loud")], || {
        let logging = resolve_logging_config();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Compact);
    });

    with_env(&[("TAWQIT_LOG_LEVEL", "warn"), ("TAWQIT_LOG_FORMAT", "json")], || {
        let logging = resolve_logging_config();
        assert_eq!(logging.level, "warn");
        assert_eq!(logging.format, LogFormat::Json);
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "TAWQIT_SLA_DEFAULT_HOURS",
        "TAWQIT_SLA_NEAR_BREACH_THRESHOLD_HOURS",
        "TAWQIT_DISPLAY_LOCALE",
        "TAWQIT_LOGGING_LEVEL",
        "TAWQIT_LOGGING_FORMAT",
        "TAWQIT_LOG_LEVEL",
        "TAWQIT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
