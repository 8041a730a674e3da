//! Confidence score normalisation.
//!
//! Upstream producers emit confidence either as a 0-1 fraction or as a 0-100
//! percentage. Everything past the deserialisation boundary uses the integer
//! 0-100 scale, so normalisation happens here and nowhere else.

use serde::{Deserialize, Deserializer};

/// Normalise a raw producer score to an integer percentage.
///
/// Scores `<= 1` are treated as fractions and scaled by 100. Anything else is
/// already a percentage. The result is rounded and clamped to `0..=100`;
/// negative and NaN inputs become 0.
///
/// # Examples
///
/// ```
/// use a11y_verify_common::normalize_confidence;
///
/// assert_eq!(normalize_confidence(0.87), 87);
/// assert_eq!(normalize_confidence(87.0), 87);
/// assert_eq!(normalize_confidence(0.0), 0);
/// assert_eq!(normalize_confidence(100.0), 100);
/// ```
pub fn normalize_confidence(raw: f64) -> u8 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    let percent = if raw <= 1.0 { raw * 100.0 } else { raw };
    percent.round().clamp(0.0, 100.0) as u8
}

/// Deserialize a possibly-null score in either scale into a 0-100 integer.
pub fn deserialize_normalized<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(normalize_confidence).unwrap_or(0))
}

/// Deserialize a score that is already on the 0-100 scale.
///
/// Unlike [`deserialize_normalized`], a value of 1 means 1%.
pub fn deserialize_percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_is_scaled() {
        assert_eq!(normalize_confidence(0.87), 87);
        assert_eq!(normalize_confidence(0.45), 45);
        assert_eq!(normalize_confidence(0.999), 100);
    }

    #[test]
    fn test_percentage_passes_through_rounded() {
        assert_eq!(normalize_confidence(87.0), 87);
        assert_eq!(normalize_confidence(59.5), 60);
        assert_eq!(normalize_confidence(100.0), 100);
    }

    #[test]
    fn test_one_is_a_full_fraction() {
        assert_eq!(normalize_confidence(1.0), 100);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        assert_eq!(normalize_confidence(0.0), 0);
        assert_eq!(normalize_confidence(-3.0), 0);
        assert_eq!(normalize_confidence(140.0), 100);
        assert_eq!(normalize_confidence(f64::NAN), 0);
    }

    #[test]
    fn test_deserialize_accepts_null_and_both_scales() {
        #[derive(Deserialize)]
        struct Scored {
            #[serde(deserialize_with = "deserialize_normalized")]
            score: u8,
        }

        let fraction: Scored = serde_json::from_str(r#"{"score": 0.92}"#).unwrap();
        assert_eq!(fraction.score, 92);
        let percent: Scored = serde_json::from_str(r#"{"score": 92}"#).unwrap();
        assert_eq!(percent.score, 92);
        let null: Scored = serde_json::from_str(r#"{"score": null}"#).unwrap();
        assert_eq!(null.score, 0);
    }

    #[derive(Deserialize)]
    struct Percent {
        #[serde(default, deserialize_with = "deserialize_percent")]
        value: u8,
    }

    fn percent(json: &str) -> u8 {
        serde_json::from_str::<Percent>(json).unwrap().value
    }

    #[test]
    fn test_percent_does_not_scale_small_values() {
        assert_eq!(percent(r#"{"value": 1}"#), 1);
        assert_eq!(percent(r#"{"value": 0.6}"#), 1);
        assert_eq!(percent(r#"{"value": 92}"#), 92);
    }

    #[test]
    fn test_percent_clamps_out_of_range() {
        assert_eq!(percent(r#"{"value": -5}"#), 0);
        assert_eq!(percent(r#"{"value": 250}"#), 100);
        assert_eq!(percent(r#"{"value": null}"#), 0);
        assert_eq!(percent("{}"), 0);
    }
}
