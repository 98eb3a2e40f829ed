//! Heuristic cost and risk estimation for SQL text.
//!
//! The estimator runs a fixed list of lexical pattern detectors over the
//! lower-cased query. It does not parse SQL: every check is a substring or
//! regular expression test, so commented-out or quoted SQL can trigger it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌────────────────┐
//! │  SQL text   │────▶│  Estimator   │────▶│ AnalysisReport │
//! └─────────────┘     └──────────────┘     └────────────────┘
//!                            │
//!                     ┌──────┴──────┐
//!                     │  Patterns   │
//!                     │  (ordered)  │
//!                     └─────────────┘
//! ```
//!
//! # Patterns
//!
//! | ID | Name | Weight |
//! |----|------|--------|
//! | COST001 | Unbounded projection (`select *`) | +2 |
//! | COST002 | Cross join | +5 |
//! | COST003 | `distinct` together with `order by` | +3 |
//! | COST004 | Three-part `from` reference without `where` | +4 |
//! | COST005 | Nested subqueries | +1 per extra `select` |
//! | COST006 | Window functions | +2 per `over(` |
//!
//! Risk factors and recommendations are appended in table order, followed by
//! the cost and complexity recommendations derived from the final score.
//!
//! # Example
//!
//! ```
//! use query_cost_estimator::estimator::{ComplexityLevel, analyze};
//!
//! let report = analyze("SELECT * FROM db.schema.table", "medium");
//!
//! assert_eq!(report.complexity_score(), 6);
//! assert_eq!(report.complexity_level(), ComplexityLevel::Medium);
//! assert_eq!(report.risk_factors().len(), 2);
//! ```

mod patterns;
mod tables;
mod types;

use compact_str::CompactString;
pub use tables::extract_table_references;
use tracing::trace;
pub use types::{
    AnalysisReport, BASE_RUNTIME_MINUTES, CautionThresholds, ComplexityLevel, Detection,
    MessageVec, PREVIEW_CHARS, PatternInfo, RUNTIME_FACTOR_PER_POINT
};

use crate::compute::ComputeSize;

/// Throughput units above which a query is called out as expensive.
pub const HIGH_COST_UNITS: f64 = 0.1;

/// Score above which testing on a small dataset is recommended.
pub const HIGH_COMPLEXITY_SCORE: u32 = 10;

/// A lexical risk detector.
///
/// Detectors receive the already lower-cased query and are independent of
/// each other: all of them run on every query.
pub trait Pattern: Send + Sync {
    /// Returns metadata about this pattern.
    fn info(&self) -> PatternInfo;

    /// Inspects lower-cased SQL text, returning a detection when it matches.
    fn detect(&self, lowered: &str) -> Option<Detection>;
}

/// Estimator bound to one compute size.
pub struct Estimator {
    patterns:     Vec<Box<dyn Pattern>>,
    compute_size: CompactString,
    rate:         u32
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new(ComputeSize::default().label())
    }
}

impl Estimator {
    /// Create an estimator for a compute size label.
    ///
    /// The label is matched case-insensitively; unknown labels are kept as
    /// given (upper-cased) but priced at the MEDIUM rate.
    pub fn new(compute_size: &str) -> Self {
        let patterns: Vec<Box<dyn Pattern>> = vec![
            Box::new(patterns::UnboundedProjection),
            Box::new(patterns::CrossProduct),
            Box::new(patterns::DistinctOrdering),
            Box::new(patterns::MissingFilter),
            Box::new(patterns::NestedSubqueries),
            Box::new(patterns::WindowFunctions)
        ];
        Self {
            patterns,
            compute_size: compute_size.trim().to_uppercase().into(),
            rate: ComputeSize::rate_for(compute_size)
        }
    }

    pub fn compute_size(&self) -> &str {
        &self.compute_size
    }

    pub fn units_per_hour(&self) -> u32 {
        self.rate
    }

    /// Identifiers of the registered patterns, in evaluation order
    pub fn pattern_ids(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|p| p.info().id).collect()
    }

    /// Analyze one query in a single pass.
    pub fn analyze(&self, query: &str) -> AnalysisReport {
        let lowered = query.to_lowercase();
        let mut report = AnalysisReport::new(query, self.compute_size.clone(), self.rate);
        for pattern in &self.patterns {
            if let Some(detection) = pattern.detect(&lowered) {
                let info = pattern.info();
                trace!(
                    pattern = info.id,
                    name = info.name,
                    weight = detection.weight,
                    "pattern matched"
                );
                report.record(detection);
            }
        }
        let units = report.estimated_throughput_units();
        if units > HIGH_COST_UNITS {
            report.recommend(format!(
                "High cost query ({:.3} throughput units) - consider optimization",
                units
            ));
        }
        if report.complexity_score() > HIGH_COMPLEXITY_SCORE {
            report.recommend(String::from("High complexity - test on small dataset first"));
        }
        report
    }
}

/// Analyze a query for the given compute size label.
pub fn analyze(query: &str, compute_size: &str) -> AnalysisReport {
    Estimator::new(compute_size).analyze(query)
}
