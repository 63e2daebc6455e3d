use std::env;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::json;
use tawqit_core::config::resolve_config_path;
use toml::Value;
use tracing::warn;
use uuid::Uuid;

use super::{load_config, CommandResult};

const COMMAND: &str = "config";

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: String,
    value: String,
    source: String,
}

pub fn run() -> CommandResult {
    let correlation_id = Uuid::new_v4().to_string();
    let config = match load_config(COMMAND, &correlation_id) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = match config_file_path.as_deref().map(load_config_file_doc).transpose() {
        Ok(doc) => doc,
        Err(error) => {
            warn!(
                event_name = "config.source_scan.failed",
                error = %format!("{error:#}"),
                "could not read config file for source attribution"
            );
            None
        }
    };
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut entries = vec![
        entry(
            "sla.default_hours",
            &config.sla.default_hours.to_string(),
            source("sla.default_hours", &["TAWQIT_SLA_DEFAULT_HOURS"]),
        ),
        entry(
            "sla.near_breach_threshold_hours",
            &config.sla.near_breach_threshold_hours.to_string(),
            source("sla.near_breach_threshold_hours", &["TAWQIT_SLA_NEAR_BREACH_THRESHOLD_HOURS"]),
        ),
    ];
    if config.sla.consultation_hours.is_empty() {
        entries.push(entry(
            "sla.consultation_hours",
            "<none>",
            source("sla.consultation_hours", &[]),
        ));
    }
    for (consultation_type, hours) in &config.sla.consultation_hours {
        entries.push(entry(
            &format!("sla.consultation_hours.{consultation_type}"),
            &hours.to_string(),
            source("sla.consultation_hours", &[]),
        ));
    }

    entries.push(entry(
        "display.locale",
        config.display.locale.as_str(),
        source("display.locale", &["TAWQIT_DISPLAY_LOCALE"]),
    ));

    entries.push(entry(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["TAWQIT_LOGGING_LEVEL", "TAWQIT_LOG_LEVEL"]),
    ));
    entries.push(entry(
        "logging.format",
        config.logging.format.as_str(),
        source("logging.format", &["TAWQIT_LOGGING_FORMAT", "TAWQIT_LOG_FORMAT"]),
    ));

    CommandResult::success_with(
        COMMAND,
        "effective config (source precedence: env > file > default)",
        Some(json!({
            "correlation_id": correlation_id,
            "config_file": config_file_path.as_ref().map(|path| path.display().to_string()),
            "entries": entries,
        })),
    )
}

fn load_config_file_doc(path: &Path) -> anyhow::Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    raw.parse::<Value>()
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn entry(key: &str, value: &str, source: String) -> ConfigEntry {
    ConfigEntry { key: key.to_string(), value: value.to_string(), source }
}
