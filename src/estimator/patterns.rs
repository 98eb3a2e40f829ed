use std::sync::LazyLock;

use regex::Regex;

use super::{Detection, Pattern, PatternInfo};

/// Three-part table reference right after FROM.
static QUALIFIED_FROM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"from\s+\w+\.\w+\.\w+").expect("valid regex"));

static SELECT_KEYWORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bselect\b").expect("valid regex"));

static WINDOW_OVER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"over\s*\(").expect("valid regex"));

/// Window function count above which materialization is suggested.
const MANY_WINDOW_FUNCTIONS: usize = 3;

fn detection(
    info: PatternInfo,
    risk_factor: impl Into<String>,
    recommendation: impl Into<String>,
    weight: u32
) -> Detection {
    Detection {
        pattern_id: info.id,
        risk_factor: Some(risk_factor.into()),
        recommendation: Some(recommendation.into()),
        weight
    }
}

/// `SELECT *` scans every column
pub struct UnboundedProjection;

impl Pattern for UnboundedProjection {
    fn info(&self) -> PatternInfo {
        PatternInfo {
            id:   "COST001",
            name: "Unbounded projection"
        }
    }

    fn detect(&self, lowered: &str) -> Option<Detection> {
        lowered.contains("select *").then(|| {
            detection(
                self.info(),
                "SELECT * detected - may scan unnecessary columns",
                "Replace SELECT * with explicit column list",
                2
            )
        })
    }
}

/// Unconditional cartesian product
pub struct CrossProduct;

impl Pattern for CrossProduct {
    fn info(&self) -> PatternInfo {
        PatternInfo {
            id:   "COST002",
            name: "Cross join"
        }
    }

    fn detect(&self, lowered: &str) -> Option<Detection> {
        lowered.contains("cross join").then(|| {
            detection(
                self.info(),
                "CROSS JOIN detected - potential cartesian product",
                "Review CROSS JOIN necessity, consider proper JOIN conditions",
                5
            )
        })
    }
}

/// DISTINCT and ORDER BY anywhere in the text, not necessarily together
pub struct DistinctOrdering;

impl Pattern for DistinctOrdering {
    fn info(&self) -> PatternInfo {
        PatternInfo {
            id:   "COST003",
            name: "Distinct with ordering"
        }
    }

    fn detect(&self, lowered: &str) -> Option<Detection> {
        (lowered.contains("distinct") && lowered.contains("order by")).then(|| {
            detection(
                self.info(),
                "DISTINCT with ORDER BY - expensive sorting operation",
                "Consider using QUALIFY with window functions instead",
                3
            )
        })
    }
}

/// Fully qualified table read with no WHERE anywhere in the statement.
///
/// The WHERE check is global: a filtered subquery suppresses the warning for
/// an unfiltered reference elsewhere in the same text.
pub struct MissingFilter;

impl Pattern for MissingFilter {
    fn info(&self) -> PatternInfo {
        PatternInfo {
            id:   "COST004",
            name: "Missing filter"
        }
    }

    fn detect(&self, lowered: &str) -> Option<Detection> {
        (QUALIFIED_FROM_REGEX.is_match(lowered) && !lowered.contains("where")).then(|| {
            detection(
                self.info(),
                "No WHERE clause - full table scan likely",
                "Add WHERE clause to filter data and improve performance",
                4
            )
        })
    }
}

/// Every SELECT beyond the first counts as a nested query
pub struct NestedSubqueries;

impl Pattern for NestedSubqueries {
    fn info(&self) -> PatternInfo {
        PatternInfo {
            id:   "COST005",
            name: "Nested subqueries"
        }
    }

    fn detect(&self, lowered: &str) -> Option<Detection> {
        let selects = SELECT_KEYWORD_REGEX.find_iter(lowered).count();
        let nested = u32::try_from(selects.saturating_sub(1)).unwrap_or(u32::MAX);
        (nested > 0).then(|| {
            detection(
                self.info(),
                format!("{} subqueries detected", nested),
                "Consider converting subqueries to CTEs for better readability",
                nested
            )
        })
    }
}

/// Window functions add score; many of them add a recommendation
pub struct WindowFunctions;

impl Pattern for WindowFunctions {
    fn info(&self) -> PatternInfo {
        PatternInfo {
            id:   "COST006",
            name: "Window functions"
        }
    }

    fn detect(&self, lowered: &str) -> Option<Detection> {
        let windows = WINDOW_OVER_REGEX.find_iter(lowered).count();
        if windows == 0 {
            return None;
        }
        let weight = u32::try_from(windows)
            .unwrap_or(u32::MAX)
            .saturating_mul(2);
        Some(Detection {
            pattern_id: self.info().id,
            risk_factor: None,
            recommendation: (windows > MANY_WINDOW_FUNCTIONS).then(|| {
                String::from("Multiple window functions - consider materialization")
            }),
            weight
        })
    }
}
