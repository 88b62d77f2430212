//! Metric normalization: one raw per-category input -> integer score in [0, 100].

use crate::types::MetricInput;
use crate::utils::clamp_score;

/// Score for labels that are missing from the table and for non-finite numbers.
pub const NEUTRAL_SCORE: u8 = 50;

/// Qualitative tiers recognized by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    High,
    Good,
    Fair,
    Weak,
}

impl Rating {
    /// Case-insensitive, whitespace-trimmed label lookup.
    pub fn parse(label: &str) -> Option<Rating> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" | "strong" | "excellent" => Some(Rating::High),
            "good" => Some(Rating::Good),
            "fair" | "average" | "medium" => Some(Rating::Fair),
            "weak" | "unstable" | "low" | "poor" => Some(Rating::Weak),
            _ => None,
        }
    }

    pub fn score(self) -> u8 {
        match self {
            Rating::High => 90,
            Rating::Good => 75,
            Rating::Fair => 60,
            Rating::Weak => 30,
        }
    }
}

pub fn normalize(input: &MetricInput) -> u8 {
    match input {
        MetricInput::Numeric(v) if v.is_finite() => clamp_score(*v),
        MetricInput::Numeric(_) => NEUTRAL_SCORE,
        MetricInput::Qualitative(label) => {
            Rating::parse(label).map(Rating::score).unwrap_or(NEUTRAL_SCORE)
        }
    }
}
