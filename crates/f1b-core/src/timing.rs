//! Time handling: display-zone conversion, countdowns and compact durations.

use chrono::{DateTime, Duration, Timelike};
use chrono_tz::Tz;

use crate::{errors::Error, Result};

/// `Monday, 02 January 2006 15:04 WET`
pub const LONG_FORMAT: &str = "%A, %d %B %Y %H:%M %Z";

/// `02 Jan 15:04 WET`
pub const SHORT_FORMAT: &str = "%d %b %H:%M %Z";

pub const DEFAULT_DISPLAY_ZONE: &str = "Europe/Lisbon";

/// The single timezone every user-facing timestamp is rendered in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayZone {
    tz: Tz,
}

impl DisplayZone {
    pub fn new(name: &str) -> Result<Self> {
        let tz = name
            .trim()
            .parse::<Tz>()
            .map_err(|_| Error::TimeZone(name.to_string()))?;
        Ok(Self { tz })
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn name(&self) -> &'static str {
        self.tz.name()
    }

    /// Combine a provider date (`2024-09-01`) and time (`13:00:00Z`) into one
    /// instant, expressed in the display zone.
    pub fn zoned(&self, date: &str, time: &str) -> Result<DateTime<Tz>> {
        let combined = combine(date, time);
        let instant =
            DateTime::parse_from_rfc3339(&combined).map_err(|e| Error::TimeParse {
                input: combined.clone(),
                reason: e.to_string(),
            })?;
        Ok(instant.with_timezone(&self.tz))
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self { tz: Tz::Europe__Lisbon }
    }
}

/// The raw `"{date}T{time}"` string the provider data describes.
pub fn combine(date: &str, time: &str) -> String {
    format!("{date}T{time}")
}

/// Classify a countdown into one of four bands.
///
/// Bands are checked in order: negative, under one hour, under a day, days.
/// Days are hours / 24, not calendar days.
pub fn countdown(d: Duration) -> String {
    if d < Duration::zero() {
        return "already over".to_string();
    }

    let ms = d.num_milliseconds();

    let hours = ms as f64 / 3_600_000.0;
    if hours < 1.0 {
        let minutes = ms as f64 / 60_000.0;
        return format!("{} minutes to go", one_decimal(minutes));
    }
    if hours < 24.0 {
        return format!("{} hours to go", one_decimal(hours));
    }
    format!("{} days to go", one_decimal(hours / 24.0))
}

/// One decimal place, exact ties rounded to even.
fn one_decimal(v: f64) -> String {
    format!("{v:.1}")
}

/// Conversational duration like `2d5h13m` or `12m40s`.
///
/// Leading zero units are skipped; once a unit is written every lower unit
/// follows. Seconds only appear while the hour component is zero.
pub fn compact_duration(d: Duration) -> String {
    let total = d.num_seconds();
    if total <= 0 {
        return "0s".to_string();
    }

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let mut out = String::new();
    if days != 0 {
        out.push_str(&format!("{days}d"));
    }
    if !out.is_empty() || hours != 0 {
        out.push_str(&format!("{hours}h"));
    }
    if !out.is_empty() || minutes != 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if hours < 1 {
        out.push_str(&format!("{seconds}s"));
    }
    out
}

/// A remark about how early the race starts in the display zone.
pub fn race_hour_comment(local: &DateTime<Tz>) -> &'static str {
    let hour = local.hour();
    if hour > 4 && hour < 9 {
        "Unfortunately it seems you'll have to wake up early if you want to watch the race :("
    } else {
        "It seems a decent hour for the race. You won't have to wake up early!"
    }
}
