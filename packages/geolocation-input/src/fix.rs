use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::PositionError;

/// A single resolved coordinate reading, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// The message a request sends to the input channel.
///
/// Serializes to `{"lat": .., "long": .., "time": ..}` or `{"error": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationResult {
    Fix {
        lat: String,
        long: String,
        time: String,
    },
    Error {
        error: String,
    },
}

impl LocationResult {
    /// Build a success message from a raw fix received at `received_at`.
    pub fn fix(coordinates: Coordinates, received_at: DateTime<Utc>, digits: usize) -> Self {
        Self::Fix {
            lat: to_fixed(coordinates.latitude, digits),
            long: to_fixed(coordinates.longitude, digits),
            time: iso_timestamp(received_at),
        }
    }

    /// Build a failure message carrying the provider's error text.
    pub fn error(error: &PositionError) -> Self {
        Self::Error {
            error: error.message.clone(),
        }
    }

    pub fn is_fix(&self) -> bool {
        matches!(self, Self::Fix { .. })
    }
}

/// Format `value` with exactly `digits` digits after the decimal point.
///
/// Matches the browser's `Number.prototype.toFixed`: an exact halfway value rounds away from
/// zero, negative zero prints without a sign, and non-finite values print as `NaN`,
/// `Infinity` or `-Infinity`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}Infinity");
    }

    let value = if value == 0.0 { 0.0 } else { value };
    match halfway_digits(value.abs(), digits) {
        Some((int, frac)) => {
            let sign = if value < 0.0 { "-" } else { "" };
            format!("{sign}{}", increment(&int, &frac))
        }
        None => format!("{value:.digits$}"),
    }
}

/// f64 has at most 1074 fractional digits, so this expansion is exact.
const EXACT_DIGITS: usize = 1100;

/// If `magnitude` lies exactly halfway between two `digits`-place values, return its integer
/// part and its first `digits` fractional digits.
fn halfway_digits(magnitude: f64, digits: usize) -> Option<(String, String)> {
    let exact = format!("{magnitude:.prec$}", prec = EXACT_DIGITS);
    let (int, frac) = exact.split_once('.')?;
    let frac = frac.trim_end_matches('0');

    if frac.len() == digits + 1 && frac.ends_with('5') {
        Some((int.to_string(), frac[..digits].to_string()))
    } else {
        None
    }
}

/// Add one unit in the last place to `int.frac` (both plain ASCII digit strings).
fn increment(int: &str, frac: &str) -> String {
    let mut digits: Vec<u8> = int.bytes().chain(frac.bytes()).collect();
    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, b'1');
    }

    let split = digits.len() - frac.len();
    let mut out: String = digits[..split].iter().map(|&b| b as char).collect();
    if !frac.is_empty() {
        out.push('.');
        out.extend(digits[split..].iter().map(|&b| b as char));
    }
    out
}

/// Format an instant as UTC ISO-8601 with millisecond precision, e.g. `2026-10-16T08:30:00.123Z`.
pub fn iso_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn fraction_len(text: &str) -> usize {
        text.split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0)
    }

    #[test]
    fn twelve_fraction_digits() {
        for value in [
            0.0,
            -0.0,
            1.0,
            -1.5,
            37.42199999999,
            -122.084,
            89.999999999999,
            -179.123456789012345,
            1e-15,
            -1e-15,
        ] {
            let text = to_fixed(value, 12);
            assert_eq!(fraction_len(&text), 12, "{text}");

            let reparsed: f64 = text.parse().unwrap();
            assert!((reparsed - value).abs() <= 0.5e-12, "{value} -> {text}");
        }
    }

    #[test]
    fn negative_zero_has_no_sign() {
        assert_eq!(to_fixed(-0.0, 12), "0.000000000000");
        assert_eq!(to_fixed(0.0, 3), "0.000");
    }

    #[test]
    fn halfway_values_round_away_from_zero() {
        let tie = 37.0 + 1.0 / 8192.0;
        assert_eq!(to_fixed(tie, 12), "37.000122070313");
        assert_eq!(to_fixed(-tie, 12), "-37.000122070313");
        assert_eq!(to_fixed(3.0 / 8192.0, 12), "0.000366210938");
        assert_eq!(to_fixed(0.25, 1), "0.3");
        assert_eq!(to_fixed(-1.5, 0), "-2");
        assert_eq!(to_fixed(9.5, 0), "10");
        assert_eq!(to_fixed(-0.5, 0), "-1");
        assert_eq!(to_fixed(99.5, 0), "100");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(0.375, 2), "0.38");
    }

    #[test]
    fn non_finite_uses_platform_spelling() {
        assert_eq!(to_fixed(f64::INFINITY, 12), "Infinity");
        assert_eq!(to_fixed(f64::NEG_INFINITY, 12), "-Infinity");
        assert_eq!(to_fixed(f64::NAN, 12), "NaN");
    }

    #[test]
    fn known_coordinates() {
        assert_eq!(to_fixed(37.42199999999, 12), "37.421999999990");
        assert_eq!(to_fixed(-122.084, 12), "-122.084000000000");
    }

    #[test]
    fn timestamps_are_utc_millis() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap()
            + chrono::Duration::milliseconds(123);
        assert_eq!(iso_timestamp(instant), "2026-10-16T08:30:00.123Z");
    }

    #[test]
    fn serializes_untagged() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let fix = LocationResult::fix(Coordinates::new(37.42199999999, -122.084), at, 12);
        assert_eq!(
            serde_json::to_value(&fix).unwrap(),
            serde_json::json!({
                "lat": "37.421999999990",
                "long": "-122.084000000000",
                "time": "2024-01-02T03:04:05.000Z",
            })
        );

        let error = LocationResult::error(&PositionError::new(1, "User denied Geolocation"));
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            serde_json::json!({ "error": "User denied Geolocation" })
        );
    }

    #[test]
    fn deserializes_both_shapes() {
        let fix: LocationResult =
            serde_json::from_str(r#"{"lat":"1.0","long":"2.0","time":"t"}"#).unwrap();
        assert!(fix.is_fix());

        let error: LocationResult = serde_json::from_str(r#"{"error":"nope"}"#).unwrap();
        assert_eq!(
            error,
            LocationResult::Error {
                error: "nope".to_string()
            }
        );
    }
}
