//! CF-convention time decoding.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

const REFERENCE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Decode numeric offsets against a CF `units` string such as
/// `"days since 1850-01-01 00:00:00"`.
///
/// Only the Gregorian family of calendars is supported; any other calendar,
/// an unknown unit or an unparsable reference date yields `None`.
pub fn decode_cf_time(
    values: &[f64],
    units: &str,
    calendar: Option<&str>,
) -> Option<Vec<DateTime<Utc>>> {
    match calendar.map(str::to_ascii_lowercase).as_deref() {
        None | Some("standard") | Some("gregorian") | Some("proleptic_gregorian") => {}
        Some(_) => return None,
    }

    let (unit, reference) = units.split_once(" since ")?;
    let millis_per_unit: f64 = match unit.trim().to_ascii_lowercase().as_str() {
        "days" | "day" | "d" => 86_400_000.0,
        "hours" | "hour" | "h" => 3_600_000.0,
        "minutes" | "minute" | "min" => 60_000.0,
        "seconds" | "second" | "s" => 1_000.0,
        _ => return None,
    };
    let epoch = parse_reference(reference.trim())?;

    values
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                return None;
            }
            epoch.checked_add_signed(Duration::milliseconds((v * millis_per_unit).round() as i64))
        })
        .collect()
}

fn parse_reference(reference: &str) -> Option<DateTime<Utc>> {
    // Drop an explicit UTC marker; offsets other than UTC are not supported.
    let reference = reference
        .trim_end_matches(" UTC")
        .trim_end_matches('Z')
        .trim();

    for format in REFERENCE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(reference, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    let date = NaiveDate::parse_from_str(reference, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}
