//! Type definitions for the cost estimator.
//!
//! - [`PatternInfo`] - Identification of a risk pattern detector
//! - [`Detection`] - What a single detector found in a query
//! - [`AnalysisReport`] - Complete, immutable result of one analysis
//! - [`ComplexityLevel`] - Display classification of a complexity score
//! - [`CautionThresholds`] - Limits above which a query needs extra care

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Base runtime of a trivial query, in minutes.
pub const BASE_RUNTIME_MINUTES: f64 = 0.5;

/// Runtime growth per complexity point.
pub const RUNTIME_FACTOR_PER_POINT: f64 = 0.2;

/// Maximum number of characters kept in a query preview.
pub const PREVIEW_CHARS: usize = 200;

/// Risk or recommendation messages. Six detectors plus two threshold notes
/// fit inline.
pub type MessageVec = SmallVec<[String; 8]>;

/// Metadata about a detector for identification and ordering.
#[derive(Debug, Clone)]
pub struct PatternInfo {
    /// Unique pattern identifier (e.g., "COST001")
    pub id:   &'static str,
    /// Human-readable pattern name
    pub name: &'static str
}

/// Outcome of a detector that matched.
///
/// A detection may add score without a risk factor (window functions) or a
/// risk factor without a recommendation; the estimator appends whatever is
/// present in detector order.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub pattern_id:     &'static str,
    pub risk_factor:    Option<String>,
    pub recommendation: Option<String>,
    pub weight:         u32
}

/// Heuristic cost report for a single query.
///
/// Runtime and throughput estimates are derived from
/// [`complexity_score`](Self::complexity_score) and
/// [`throughput_units_per_hour`](Self::throughput_units_per_hour) on every
/// call and cannot be set independently.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    query_preview:             String,
    target_compute_size:       CompactString,
    throughput_units_per_hour: u32,
    risk_factors:              MessageVec,
    recommendations:           MessageVec,
    complexity_score:          u32
}

impl AnalysisReport {
    pub(super) fn new(query: &str, target_compute_size: CompactString, rate: u32) -> Self {
        Self {
            query_preview: preview(query),
            target_compute_size,
            throughput_units_per_hour: rate,
            risk_factors: SmallVec::new(),
            recommendations: SmallVec::new(),
            complexity_score: 0
        }
    }

    pub(super) fn record(&mut self, detection: Detection) {
        if let Some(risk) = detection.risk_factor {
            self.risk_factors.push(risk);
        }
        if let Some(rec) = detection.recommendation {
            self.recommendations.push(rec);
        }
        self.complexity_score = self.complexity_score.saturating_add(detection.weight);
    }

    pub(super) fn recommend(&mut self, recommendation: String) {
        self.recommendations.push(recommendation);
    }

    pub fn query_preview(&self) -> &str {
        &self.query_preview
    }

    pub fn target_compute_size(&self) -> &str {
        &self.target_compute_size
    }

    pub fn throughput_units_per_hour(&self) -> u32 {
        self.throughput_units_per_hour
    }

    pub fn risk_factors(&self) -> &[String] {
        &self.risk_factors
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn complexity_score(&self) -> u32 {
        self.complexity_score
    }

    /// `0.5 * (1 + score * 0.2)`
    pub fn estimated_runtime_minutes(&self) -> f64 {
        BASE_RUNTIME_MINUTES * (1.0 + f64::from(self.complexity_score) * RUNTIME_FACTOR_PER_POINT)
    }

    /// Runtime in hours times the hourly rate of the compute size.
    pub fn estimated_throughput_units(&self) -> f64 {
        self.estimated_runtime_minutes() / 60.0 * f64::from(self.throughput_units_per_hour)
    }

    /// Monetary estimate at the given price per throughput unit.
    pub fn estimated_cost(&self, unit_price: f64) -> f64 {
        self.estimated_throughput_units() * unit_price
    }

    pub fn complexity_level(&self) -> ComplexityLevel {
        ComplexityLevel::from_score(self.complexity_score)
    }

    /// Whether estimated cost or complexity exceeds the given thresholds.
    pub fn requires_caution(&self, thresholds: &CautionThresholds) -> bool {
        self.estimated_throughput_units() > thresholds.max_throughput_units
            || self.complexity_score > thresholds.max_complexity
    }
}

fn preview(query: &str) -> String {
    let mut chars = query.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Three-level classification of a complexity score, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ComplexityLevel {
    /// Score 0-5
    Low,
    /// Score 6-10
    Medium,
    /// Score above 10
    High
}

impl ComplexityLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=5 => Self::Low,
            6..=10 => Self::Medium,
            _ => Self::High
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high")
        }
    }
}

/// Limits above which a query is flagged for caution (exit code 2).
#[derive(Debug, Clone, Deserialize)]
pub struct CautionThresholds {
    #[serde(default = "default_max_throughput_units")]
    pub max_throughput_units: f64,
    #[serde(default = "default_max_complexity")]
    pub max_complexity:       u32
}

fn default_max_throughput_units() -> f64 {
    0.5
}

fn default_max_complexity() -> u32 {
    15
}

impl Default for CautionThresholds {
    fn default() -> Self {
        Self {
            max_throughput_units: default_max_throughput_units(),
            max_complexity:       default_max_complexity()
        }
    }
}
