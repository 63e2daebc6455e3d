use serde::{Deserialize, Serialize};

use crate::errors::SlaError;
use crate::sla::status::{SlaStatus, MILLIS_PER_HOUR, MILLIS_PER_MINUTE};

/// Shown in place of a countdown when the ticket's timing data is unusable.
pub const PLACEHOLDER: &str = "—";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    fn time_exceeded(self) -> &'static str {
        match self {
            Self::En => "Time exceeded",
            Self::Ar => "توقف الوقت",
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = SlaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let language = normalized.split(['-', '_']).next().unwrap_or_default();
        match language {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            _ => Err(SlaError::UnsupportedLocale { value: value.to_owned() }),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders the remaining time as "X hours Y minutes", or the locale's fixed
/// "time exceeded" text once the ticket is breached.
///
/// Hours are not rolled over into days and minutes are floored.
pub fn format_remaining(status: &SlaStatus, locale: Locale) -> String {
    if status.is_breached() {
        return locale.time_exceeded().to_owned();
    }

    let remaining_ms = status.remaining_ms.max(0);
    let hours = remaining_ms / MILLIS_PER_HOUR;
    let minutes = (remaining_ms % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;

    match locale {
        Locale::En => format!(
            "{hours} {} {minutes} {}",
            english_unit(hours, "hour", "hours"),
            english_unit(minutes, "minute", "minutes")
        ),
        Locale::Ar => format!("{} ساعة {} دقيقة", arabic_digits(hours), arabic_digits(minutes)),
    }
}

fn english_unit(count: i64, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

fn arabic_digits(value: i64) -> String {
    value
        .to_string()
        .chars()
        .map(|ch| match ch.to_digit(10) {
            Some(digit) => char::from_u32(0x0660 + digit).unwrap_or(ch),
            None => ch,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{format_remaining, Locale};
    use crate::errors::SlaError;
    use crate::sla::status::{compute_sla_status, SlaStatus};

    fn status_at(hour: u32, minute: u32, day: u32) -> SlaStatus {
        compute_sla_status(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            24.0,
            Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0).unwrap(),
            4.0,
        )
        .expect("valid status")
    }

    #[test]
    fn english_shows_hours_and_minutes() {
        assert_eq!(format_remaining(&status_at(12, 0, 1), Locale::En), "12 hours 0 minutes");
        assert_eq!(format_remaining(&status_at(20, 45, 1), Locale::En), "3 hours 15 minutes");
        assert_eq!(format_remaining(&status_at(22, 59, 1), Locale::En), "1 hour 1 minute");
    }

    #[test]
    fn arabic_uses_arabic_indic_digits() {
        assert_eq!(format_remaining(&status_at(20, 45, 1), Locale::Ar), "٣ ساعة ١٥ دقيقة");
        assert_eq!(format_remaining(&status_at(0, 0, 1), Locale::Ar), "٢٤ ساعة ٠ دقيقة");
    }

    #[test]
    fn breached_tickets_show_fixed_text() {
        let breached = status_at(1, 0, 2);

        assert_eq!(format_remaining(&breached, Locale::En), "Time exceeded");
        assert_eq!(format_remaining(&breached, Locale::Ar), "توقف الوقت");
    }

    #[test]
    fn locale_does_not_change_the_underlying_numbers() {
        let status = status_at(21, 0, 1);
        let english = format_remaining(&status, Locale::En);
        let arabic = format_remaining(&status, Locale::Ar);

        assert_eq!(english, "3 hours 0 minutes");
        assert_eq!(arabic, "٣ ساعة ٠ دقيقة");
    }

    #[test]
    fn parses_language_tags_with_regions() {
        assert_eq!("ar-SA".parse::<Locale>(), Ok(Locale::Ar));
        assert_eq!("EN_us".parse::<Locale>(), Ok(Locale::En));
        assert_eq!(" en ".parse::<Locale>(), Ok(Locale::En));
        assert!(matches!("fr".parse::<Locale>(), Err(SlaError::UnsupportedLocale { .. })));
    }
}
