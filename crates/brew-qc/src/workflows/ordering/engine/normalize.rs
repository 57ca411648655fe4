use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::super::domain::{Criterion, CriterionKind, NormalizationConfig};

pub(crate) const MIN_SCORE: f64 = 0.0;
pub(crate) const MAX_SCORE: f64 = 100.0;
pub(crate) const DEFAULT_DATE_WINDOW_DAYS: f64 = 30.0;
const DEGENERATE_RANGE_SCORE: f64 = 50.0;

/// Maps a raw value onto the 0-100 desirability scale for one criterion.
///
/// Absent values take the configured default (or 0) as-is, skipping both the kind-specific
/// strategy and the direction flip.
pub(crate) fn normalize(raw: Option<&Value>, criterion: &Criterion, now: DateTime<Utc>) -> f64 {
    let config = criterion.normalization.as_ref();
    let Some(value) = raw else {
        return fallback_score(config);
    };

    let score = match criterion.kind {
        CriterionKind::Numeric => numeric(value, config),
        CriterionKind::Date => date(value, config, now),
        CriterionKind::Enum => categorical(value, &criterion.options),
        CriterionKind::Boolean => boolean(value),
    };

    criterion.direction.apply(score)
}

fn fallback_score(config: Option<&NormalizationConfig>) -> f64 {
    clamp_score(
        config
            .and_then(|config| config.default_value)
            .unwrap_or(MIN_SCORE),
    )
}

fn numeric(value: &Value, config: Option<&NormalizationConfig>) -> f64 {
    let Some(number) = as_number(value) else {
        return MIN_SCORE;
    };

    match config.and_then(|config| config.min.zip(config.max)) {
        Some((min, max)) if max == min => DEGENERATE_RANGE_SCORE,
        Some((min, max)) => clamp_score((number - min) / (max - min) * MAX_SCORE),
        None => clamp_score(number),
    }
}

fn date(value: &Value, config: Option<&NormalizationConfig>, now: DateTime<Utc>) -> f64 {
    let Some(timestamp) = as_timestamp(value) else {
        return MIN_SCORE;
    };

    let window = config
        .and_then(|config| config.max)
        .filter(|days| *days > 0.0)
        .unwrap_or(DEFAULT_DATE_WINDOW_DAYS);
    let days_old = (now - timestamp).num_days() as f64;

    if days_old <= 0.0 {
        MAX_SCORE
    } else if days_old >= window {
        MIN_SCORE
    } else {
        clamp_score(MAX_SCORE - (days_old / window) * MAX_SCORE)
    }
}

fn categorical(value: &Value, options: &[String]) -> f64 {
    let Some(index) = value
        .as_str()
        .and_then(|label| options.iter().position(|option| option == label))
    else {
        return MIN_SCORE;
    };

    if options.len() == 1 {
        return MAX_SCORE;
    }

    index as f64 / (options.len() - 1) as f64 * MAX_SCORE
}

fn boolean(value: &Value) -> f64 {
    if value.as_bool() == Some(true) {
        MAX_SCORE
    } else {
        MIN_SCORE
    }
}

/// Pins a score to the scale. NaN (e.g. `inf / inf` from extreme bounds) scores as the minimum.
pub(crate) fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return MIN_SCORE;
    }
    score.clamp(MIN_SCORE, MAX_SCORE)
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|number| number.is_finite())
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_timestamp(raw),
        Value::Number(millis) => millis
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` values (read as UTC), and
/// plain `YYYY-MM-DD` dates (midnight UTC).
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
