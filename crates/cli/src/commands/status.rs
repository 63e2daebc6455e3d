use clap::Args;
use serde_json::json;
use tawqit_core::clock::SystemClock;
use tawqit_core::errors::SlaError;
use tawqit_core::sla::{parse_timestamp, Locale, SlaPolicy, SlaSnapshot, SlaStatus, SlaTracker};
use uuid::Uuid;

use super::{load_config, CommandResult};

const COMMAND: &str = "status";

#[derive(Debug, Clone, Default, Args)]
pub struct StatusArgs {
    #[arg(long, help = "Ticket creation time (RFC 3339 or epoch milliseconds)")]
    pub created_at: String,
    #[arg(long, help = "SLA budget in hours; overrides the consultation type default")]
    pub sla_hours: Option<f64>,
    #[arg(long, help = "Consultation type used to look up the configured SLA budget")]
    pub consultation_type: Option<String>,
    #[arg(long, help = "Evaluate at this instant instead of the current time")]
    pub now: Option<String>,
    #[arg(long, help = "Near-breach warning window in hours")]
    pub threshold_hours: Option<f64>,
    #[arg(long, help = "Label locale (en|ar); defaults to display.locale")]
    pub locale: Option<String>,
}

pub fn run(args: &StatusArgs) -> CommandResult {
    let correlation_id = Uuid::new_v4().to_string();
    let config = match load_config(COMMAND, &correlation_id) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let locale = match args.locale.as_deref().map(str::parse::<Locale>).transpose() {
        Ok(locale) => locale.unwrap_or(config.display.locale),
        Err(error) => {
            return CommandResult::from_application_error(COMMAND, error.into(), &correlation_id)
        }
    };

    let tracker = SlaTracker::from_policy(SystemClock, &config.sla).with_threshold_hours(
        args.threshold_hours.unwrap_or(config.sla.near_breach_threshold_hours),
    );

    let (sla_hours, status) = match evaluate(args, &config.sla, &tracker) {
        Ok(evaluated) => evaluated,
        Err(error) => {
            let snapshot = SlaSnapshot::unavailable(&error);
            return CommandResult::from_application_error_with(
                COMMAND,
                error.into(),
                &correlation_id,
                Some(json!({
                    "correlation_id": correlation_id,
                    "locale": locale,
                    "snapshot": snapshot,
                })),
            );
        }
    };

    let risk_level = status.risk_level;
    let snapshot = SlaSnapshot::from_status(status, locale);
    CommandResult::success_with(
        COMMAND,
        format!("ticket is {risk_level}"),
        Some(json!({
            "correlation_id": correlation_id,
            "locale": locale,
            "sla_hours": sla_hours,
            "snapshot": snapshot,
        })),
    )
}

fn evaluate(
    args: &StatusArgs,
    policy: &SlaPolicy,
    tracker: &SlaTracker<SystemClock>,
) -> Result<(f64, SlaStatus), SlaError> {
    let created_at = parse_timestamp("created_at", &args.created_at)?;
    let now = args.now.as_deref().map(|raw| parse_timestamp("now", raw)).transpose()?;
    let sla_hours = policy.hours_for(args.consultation_type.as_deref(), args.sla_hours)?;
    Ok((sla_hours, tracker.compute(created_at, sla_hours, now)?))
}
