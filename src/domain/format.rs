//! Outcome formatting.
//!
//! Pure functions that turn heterogeneous backend fields into display
//! values. Every function here is total: malformed input degrades to a
//! documented default instead of an error.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde_json::Value;

/// Name used when no team name candidate is present.
pub const DEFAULT_TEAM_NAME: &str = "Team";

/// Glyph rendered in place of a team image that is absent or failed to load.
pub const PLACEHOLDER_GLYPH: &str = "🏏";

/// Label for absent or unparsable timestamps.
pub const UNKNOWN_TIME: &str = "Unknown";

/// Label for a single unparsable percentage.
pub const UNPARSABLE_PERCENT: &str = "--%";

/// Label for countdowns to an active event.
pub const LIVE_LABEL: &str = "LIVE";

const TEAM_NAME_FIELDS: [&str; 5] = ["name", "shortName", "displayName", "teamName", "abbreviation"];
const TEAM_IMAGE_FIELDS: [&str; 6] = ["imageUrl", "logoUrl", "logo", "iconUrl", "badgeUrl", "pictureUrl"];

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const FIFTY: Decimal = dec!(50);

/// Resolve a team's display name from the first non-blank candidate field.
#[must_use]
pub fn team_name(team: &Value) -> String {
    TEAM_NAME_FIELDS
        .iter()
        .filter_map(|field| team.get(field).and_then(Value::as_str))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(DEFAULT_TEAM_NAME)
        .to_string()
}

/// Resolve a team image URL from the first string-typed candidate field.
///
/// Stray quote and backtick characters are stripped. Returns `None` when
/// no candidate is a string or the cleaned value is empty.
#[must_use]
pub fn team_image_url(team: &Value) -> Option<String> {
    let raw = TEAM_IMAGE_FIELDS
        .iter()
        .find_map(|field| team.get(field).and_then(Value::as_str))?;
    let cleaned: String = raw.chars().filter(|c| *c != '`' && *c != '"').collect();
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// What to draw for a team: its image, or the placeholder glyph.
///
/// A failed image load falls back to the glyph; the row is never hidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamBadge {
    Image(String),
    Placeholder,
}

impl TeamBadge {
    #[must_use]
    pub fn resolve(image_url: Option<String>, load_failed: bool) -> Self {
        match image_url {
            Some(url) if !load_failed => Self::Image(url),
            _ => Self::Placeholder,
        }
    }

    #[must_use]
    pub fn glyph(&self) -> &str {
        match self {
            Self::Image(_) => "▣",
            Self::Placeholder => PLACEHOLDER_GLYPH,
        }
    }
}

/// Parse a number from a JSON number or a numeric string.
#[must_use]
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => decimal_from_str(s),
        _ => None,
    }
}

/// Parse a decimal string, accepting scientific notation.
#[must_use]
pub fn decimal_from_str(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Parse a probability into a percentage in `[0, 100]`.
///
/// Accepts numbers and percent-suffixed strings. Values at or below 1 are
/// read as fractions and scaled by 100. Returns `None` for non-numeric input.
#[must_use]
pub fn parse_probability(raw: &Value) -> Option<Decimal> {
    let parsed = match raw {
        Value::String(s) => decimal_from_str(s.replace('%', "").as_str()),
        other => decimal_from_value(other),
    }?;
    let scaled = if parsed <= Decimal::ONE {
        parsed * HUNDRED
    } else {
        parsed
    };
    Some(clamp_percent(scaled))
}

/// Clamp a percentage into `[0, 100]`.
#[must_use]
pub fn clamp_percent(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(HUNDRED)
}

/// Round a percentage half away from zero to a whole number.
#[must_use]
pub fn round_percent(value: Decimal) -> Decimal {
    clamp_percent(value).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a parsed percentage for display, e.g. `"43%"`.
#[must_use]
pub fn percent_text(value: Decimal) -> String {
    format!("{}%", round_percent(value).normalize())
}

/// Parse and format a raw probability; `"--%"` when unparsable.
#[must_use]
pub fn format_percent(raw: &Value) -> String {
    parse_probability(raw).map_or_else(|| UNPARSABLE_PERCENT.to_string(), percent_text)
}

/// Two-sided win probabilities from an event's JSON-encoded stats blob.
///
/// Reads `result_prediction: [{value}, {value}]`. Anything malformed yields
/// the 50/50 default; an individual unparsable side falls back to 50.
#[must_use]
pub fn result_prediction(stats: Option<&str>) -> (Decimal, Decimal) {
    let default = (FIFTY, FIFTY);
    let Some(stats) = stats.filter(|s| !s.trim().is_empty()) else {
        return default;
    };
    let Ok(parsed) = serde_json::from_str::<Value>(stats) else {
        return default;
    };
    match parsed.get("result_prediction").and_then(Value::as_array) {
        Some(pair) if pair.len() == 2 => {
            let side = |entry: &Value| {
                entry
                    .get("value")
                    .and_then(parse_probability)
                    .unwrap_or(FIFTY)
            };
            (side(&pair[0]), side(&pair[1]))
        }
        _ => default,
    }
}

/// Parse a timestamp as RFC 3339, falling back to a few naive layouts (UTC).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Coarse human label for the distance between `now` and a timestamp.
///
/// Future: `"2d 3h"`, `"1h 30m"`, `"45m"`, `"in 45s"`. Past labels carry
/// the same magnitude followed by `" ago"`. Absent or invalid input yields
/// `"Unknown"`.
#[must_use]
pub fn relative_time(iso: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(at) = iso.and_then(parse_timestamp) else {
        return UNKNOWN_TIME.to_string();
    };
    let diff = at.signed_duration_since(now);
    let future = diff.num_milliseconds() > 0;
    let secs = diff.num_seconds().unsigned_abs();
    let (mins, hours, days) = (secs / 60, secs / 3600, secs / 86_400);

    let magnitude = if days > 0 {
        format!("{days}d {}h", hours % 24)
    } else if hours > 0 {
        format!("{hours}h {}m", mins % 60)
    } else if mins > 0 {
        format!("{mins}m")
    } else if future {
        return format!("in {secs}s");
    } else {
        format!("{secs}s")
    };

    if future {
        magnitude
    } else {
        format!("{magnitude} ago")
    }
}

/// Day-granular countdown to an event start.
///
/// `"LIVE"` when the event status reads active or live; otherwise the
/// signed calendar-day distance: `"N days"`, `"N days ago"`, or `"Today"`.
#[must_use]
pub fn countdown_label(start_secs: Option<i64>, status: Option<&str>, now: DateTime<Utc>) -> String {
    if let Some(status) = status {
        let upper = status.to_ascii_uppercase();
        if upper.contains("ACTIVE") || upper.contains("LIVE") {
            return LIVE_LABEL.to_string();
        }
    }
    let Some(start) = start_secs.and_then(|s| Utc.timestamp_opt(s, 0).single()) else {
        return UNKNOWN_TIME.to_string();
    };
    let days = (start.date_naive() - now.date_naive()).num_days();
    let unit = |n: i64| if n == 1 { "day" } else { "days" };
    match days {
        0 => "Today".to_string(),
        n if n > 0 => format!("{n} {}", unit(n)),
        n => format!("{} {} ago", -n, unit(-n)),
    }
}

/// Compact time-until label for list rows: `"3d"`, `"5h"`, `"12m"`.
///
/// Started events read `"0m"`; absent start times read `"--"`.
#[must_use]
pub fn time_until(start_secs: Option<i64>, now: DateTime<Utc>) -> String {
    let Some(start) = start_secs else {
        return "--".to_string();
    };
    let diff = start - now.timestamp();
    if diff <= 0 {
        return "0m".to_string();
    }
    if diff >= 86_400 {
        return format!("{}d", diff / 86_400);
    }
    if diff >= 3_600 {
        return format!("{}h", diff / 3_600);
    }
    format!("{}m", diff / 60)
}

/// `"N days"` until (or since) a prediction's event start, or `"Today"`.
///
/// Used in "Match starts in ..." badges. The distance is unsigned and
/// rounded up to whole days.
#[must_use]
pub fn starts_in_label(iso: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(at) = iso.and_then(parse_timestamp) else {
        return "Today".to_string();
    };
    let millis = at.signed_duration_since(now).num_milliseconds().unsigned_abs();
    let days = millis.div_ceil(86_400_000);
    match days {
        0 => "Today".to_string(),
        1 => "1 day".to_string(),
        n => format!("{n} days"),
    }
}

/// Event start as `"Mar 10, 2025 12:00 UTC"`; `"Unknown"` when absent.
#[must_use]
pub fn start_label(start_secs: Option<i64>) -> String {
    start_secs
        .and_then(|s| Utc.timestamp_opt(s, 0).single())
        .map_or_else(
            || UNKNOWN_TIME.to_string(),
            |at| at.format("%b %-d, %Y %H:%M UTC").to_string(),
        )
}

/// Split an `"A vs B"` event name into its two sides.
#[must_use]
pub fn split_teams(name: &str) -> (String, String) {
    let lower = name.to_ascii_lowercase();
    let found = lower
        .match_indices(" vs ")
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    match found.as_slice() {
        [at] => (
            name[..*at].trim().to_string(),
            name[at + 4..].trim().to_string(),
        ),
        _ => (name.to_string(), String::new()),
    }
}

/// Two-letter uppercase tag for a team name.
#[must_use]
pub fn team_tag(name: &str) -> String {
    name.trim().chars().take(2).collect::<String>().to_uppercase()
}

/// Format a dollar amount with two decimals.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

/// `"m/i is matched"` for a partially matched stake, `"--"` otherwise.
#[must_use]
pub fn matched_text(matched: Option<Decimal>, investment: Option<Decimal>) -> String {
    match (matched.unwrap_or_default(), investment) {
        (matched, Some(invest)) if invest > Decimal::ZERO => {
            format!("{:.2}/{:.2} is matched", matched, invest)
        }
        _ => "--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn starts_in_rounds_up_whole_days() {
        let later = (now() + Duration::hours(30)).to_rfc3339();
        let earlier = (now() - Duration::hours(20)).to_rfc3339();
        assert_eq!(starts_in_label(Some(&later), now()), "2 days");
        assert_eq!(starts_in_label(Some(&earlier), now()), "1 day");
        assert_eq!(starts_in_label(Some(&now().to_rfc3339()), now()), "Today");
        assert_eq!(starts_in_label(None, now()), "Today");
    }

    #[test]
    fn start_label_formats_utc() {
        assert_eq!(start_label(Some(now().timestamp())), "Mar 10, 2025 12:00 UTC");
        assert_eq!(start_label(None), UNKNOWN_TIME);
    }

    #[test]
    fn team_name_picks_first_non_blank_candidate() {
        assert_eq!(team_name(&json!({"name": " ", "shortName": "IND"})), "IND");
        assert_eq!(team_name(&json!({"abbreviation": "AUS"})), "AUS");
        assert_eq!(team_name(&json!({"name": 7})), DEFAULT_TEAM_NAME);
        assert_eq!(team_name(&Value::Null), DEFAULT_TEAM_NAME);
    }

    #[test]
    fn image_url_strips_quotes_and_backticks() {
        let team = json!({"logoUrl": " `https://cdn.example/ind.png\"` "});
        assert_eq!(
            team_image_url(&team).as_deref(),
            Some("https://cdn.example/ind.png")
        );
    }

    #[test]
    fn image_url_takes_first_string_field_even_if_empty() {
        let team = json!({"imageUrl": 3, "logoUrl": "", "logo": "x.png"});
        assert_eq!(team_image_url(&team), None);
    }

    #[test]
    fn failed_image_falls_back_to_placeholder() {
        let badge = TeamBadge::resolve(Some("a.png".into()), true);
        assert_eq!(badge, TeamBadge::Placeholder);
        assert_eq!(badge.glyph(), PLACEHOLDER_GLYPH);
        assert_eq!(TeamBadge::resolve(None, false), TeamBadge::Placeholder);
    }

    #[test]
    fn probability_parsing_scales_fractions_and_clamps() {
        assert_eq!(parse_probability(&json!("43")), Some(dec!(43)));
        assert_eq!(parse_probability(&json!("43%")), Some(dec!(43)));
        assert_eq!(parse_probability(&json!(0.43)), Some(dec!(43)));
        assert_eq!(parse_probability(&json!(1)), Some(dec!(100)));
        assert_eq!(parse_probability(&json!(0)), Some(dec!(0)));
        assert_eq!(parse_probability(&json!(250)), Some(dec!(100)));
        assert_eq!(parse_probability(&json!("abc")), None);
        assert_eq!(parse_probability(&Value::Null), None);
    }

    #[test]
    fn format_percent_rounds_and_defaults() {
        assert_eq!(format_percent(&json!("43.5")), "44%");
        assert_eq!(format_percent(&json!(0.125)), "13%");
        assert_eq!(format_percent(&json!("abc")), UNPARSABLE_PERCENT);
    }

    #[test]
    fn result_prediction_reads_pair() {
        let stats = r#"{"result_prediction":[{"value":"60"},{"value":"40"}]}"#;
        assert_eq!(result_prediction(Some(stats)), (dec!(60), dec!(40)));
    }

    #[test]
    fn result_prediction_defaults_to_even_split() {
        assert_eq!(result_prediction(None), (dec!(50), dec!(50)));
        assert_eq!(result_prediction(Some("{not json")), (dec!(50), dec!(50)));
        assert_eq!(
            result_prediction(Some(r#"{"result_prediction":[{"value":"70"}]}"#)),
            (dec!(50), dec!(50))
        );
        assert_eq!(
            result_prediction(Some(r#"{"result_prediction":[{"value":"x"},{"value":"30"}]}"#)),
            (dec!(50), dec!(30))
        );
    }

    #[test]
    fn relative_time_is_symmetric() {
        let future = (now() + Duration::minutes(90)).to_rfc3339();
        let past = (now() - Duration::minutes(90)).to_rfc3339();
        assert_eq!(relative_time(Some(&future), now()), "1h 30m");
        assert_eq!(relative_time(Some(&past), now()), "1h 30m ago");
    }

    #[test]
    fn relative_time_labels() {
        let at = |d: Duration| (now() + d).to_rfc3339();
        assert_eq!(relative_time(Some(&at(Duration::hours(51))), now()), "2d 3h");
        assert_eq!(relative_time(Some(&at(Duration::seconds(45))), now()), "in 45s");
        assert_eq!(relative_time(Some(&at(Duration::hours(-3))), now()), "3h 0m ago");
        assert_eq!(relative_time(Some(&at(Duration::minutes(-5))), now()), "5m ago");
    }

    #[test]
    fn relative_time_unknown_for_missing_or_invalid() {
        assert_eq!(relative_time(None, now()), UNKNOWN_TIME);
        assert_eq!(relative_time(Some("yesterday-ish"), now()), UNKNOWN_TIME);
    }

    #[test]
    fn naive_timestamps_are_read_as_utc() {
        assert_eq!(
            parse_timestamp("2025-03-10T13:30:00"),
            Some(now() + Duration::minutes(90))
        );
    }

    #[test]
    fn countdown_reports_live_and_day_counts() {
        let day = 86_400;
        let start = now().timestamp();
        assert_eq!(countdown_label(Some(start), Some("EVENT_STATUS_ACTIVE"), now()), "LIVE");
        assert_eq!(countdown_label(Some(start), Some("EVENT_STATUS_UPCOMING"), now()), "Today");
        assert_eq!(countdown_label(Some(start + day), None, now()), "1 day");
        assert_eq!(countdown_label(Some(start + 3 * day), None, now()), "3 days");
        assert_eq!(countdown_label(Some(start - 2 * day), None, now()), "2 days ago");
        assert_eq!(countdown_label(None, None, now()), UNKNOWN_TIME);
    }

    #[test]
    fn time_until_is_compact() {
        let start = now().timestamp();
        assert_eq!(time_until(Some(start + 3 * 86_400 + 5), now()), "3d");
        assert_eq!(time_until(Some(start + 5 * 3_600), now()), "5h");
        assert_eq!(time_until(Some(start + 12 * 60 + 30), now()), "12m");
        assert_eq!(time_until(Some(start - 10), now()), "0m");
        assert_eq!(time_until(None, now()), "--");
    }

    #[test]
    fn split_teams_on_vs() {
        assert_eq!(
            split_teams("India VS Australia"),
            ("India".to_string(), "Australia".to_string())
        );
        assert_eq!(split_teams("Grand Prix"), ("Grand Prix".to_string(), String::new()));
        assert_eq!(team_tag(" india"), "IN");
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_currency(dec!(12.5)), "$12.50");
        assert_eq!(
            matched_text(Some(dec!(25)), Some(dec!(100))),
            "25.00/100.00 is matched"
        );
        assert_eq!(matched_text(Some(dec!(25)), Some(dec!(0))), "--");
        assert_eq!(matched_text(None, None), "--");
    }
}
