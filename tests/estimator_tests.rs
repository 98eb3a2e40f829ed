use query_cost_estimator::estimator::{ComplexityLevel, Estimator, analyze};

const SELECT_STAR_RISK: &str = "SELECT * detected - may scan unnecessary columns";
const MISSING_FILTER_RISK: &str = "No WHERE clause - full table scan likely";
const MANY_WINDOWS_REC: &str = "Multiple window functions - consider materialization";

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_select_star_adds_two() {
    let report = analyze("SELECT * FROM users WHERE id = 1", "MEDIUM");
    assert!(report.risk_factors().contains(&SELECT_STAR_RISK.to_string()));
    assert_eq!(report.complexity_score(), 2);
}

#[test]
fn test_select_star_is_case_insensitive() {
    let report = analyze("select * from t where x = 1", "MEDIUM");
    assert_eq!(report.complexity_score(), 2);
}

#[test]
fn test_cross_join_adds_five() {
    let report = analyze("SELECT a.id FROM a CROSS JOIN b WHERE a.x = 1", "MEDIUM");
    assert_eq!(report.complexity_score(), 5);
    assert_eq!(
        report.risk_factors(),
        ["CROSS JOIN detected - potential cartesian product"]
    );
}

#[test]
fn test_distinct_with_order_by_adds_three_once() {
    let report = analyze(
        "SELECT DISTINCT id FROM t WHERE x = 1 ORDER BY id ORDER BY id DISTINCT",
        "MEDIUM"
    );
    assert_eq!(report.complexity_score(), 3);
}

#[test]
fn test_distinct_order_by_relative_order_irrelevant() {
    let report = analyze("SELECT id FROM t WHERE x = 1 ORDER BY (SELECT DISTINCT 1)", "MEDIUM");
    // 3 for distinct/order by, 1 for the nested select
    assert_eq!(report.complexity_score(), 4);
}

#[test]
fn test_distinct_without_order_by() {
    let report = analyze("SELECT DISTINCT id FROM t WHERE x = 1", "MEDIUM");
    assert_eq!(report.complexity_score(), 0);
}

#[test]
fn test_missing_filter_on_three_part_reference() {
    let report = analyze("SELECT id FROM db.schema.events", "MEDIUM");
    assert_eq!(report.risk_factors(), [MISSING_FILTER_RISK]);
    assert_eq!(report.complexity_score(), 4);
}

#[test]
fn test_missing_filter_needs_three_parts() {
    let report = analyze("SELECT id FROM schema.events", "MEDIUM");
    assert_eq!(report.complexity_score(), 0);
}

#[test]
fn test_where_anywhere_suppresses_missing_filter() {
    let report = analyze(
        "SELECT id FROM db.s.big JOIN (SELECT id FROM db.s.small WHERE ok) x ON true",
        "MEDIUM"
    );
    assert!(!report.risk_factors().contains(&MISSING_FILTER_RISK.to_string()));
}

#[test]
fn test_subqueries_add_one_per_extra_select() {
    let report = analyze(
        "SELECT a FROM (SELECT a FROM (SELECT a FROM t WHERE a > 0))",
        "MEDIUM"
    );
    assert_eq!(report.complexity_score(), 2);
    assert_eq!(report.risk_factors(), ["2 subqueries detected"]);
    assert_eq!(
        report.recommendations(),
        ["Consider converting subqueries to CTEs for better readability"]
    );
}

#[test]
fn test_select_word_boundary() {
    let report = analyze("SELECT selected, preselect FROM t WHERE x", "MEDIUM");
    assert_eq!(report.complexity_score(), 0);
}

#[test]
fn test_three_windows_no_recommendation() {
    let report = analyze(
        "SELECT rank() OVER (ORDER BY a), rank() over(order by b), sum(c) OVER(PARTITION BY d) FROM t WHERE x",
        "MEDIUM"
    );
    // ORDER BY inside OVER does not count without DISTINCT
    assert_eq!(report.complexity_score(), 6);
    assert!(report.risk_factors().is_empty());
    assert!(!report.recommendations().contains(&MANY_WINDOWS_REC.to_string()));
}

#[test]
fn test_four_windows_recommendation() {
    let report = analyze(
        "SELECT rank() OVER (ORDER BY a), rank() over(order by b), sum(c) OVER(PARTITION BY d), \
         lag(e) over  (order by f) FROM t WHERE x",
        "MEDIUM"
    );
    assert_eq!(report.complexity_score(), 8);
    assert!(report.recommendations().contains(&MANY_WINDOWS_REC.to_string()));
}

#[test]
fn test_select_star_on_unfiltered_qualified_table() {
    let report = analyze("SELECT * FROM db.schema.table", "MEDIUM");
    assert_eq!(report.risk_factors(), [SELECT_STAR_RISK, MISSING_FILTER_RISK]);
    assert_eq!(report.complexity_score(), 6);
    assert_eq!(report.complexity_level(), ComplexityLevel::Medium);
    assert!(approx(report.estimated_runtime_minutes(), 1.1));
    assert!(approx(report.estimated_throughput_units(), 1.1 / 60.0 * 4.0));
    assert!(
        !report
            .recommendations()
            .iter()
            .any(|r| r.starts_with("High cost query"))
    );
}

#[test]
fn test_risk_factor_order_follows_detectors() {
    let report = analyze(
        "SELECT *, COUNT(DISTINCT x) FROM db.s.a CROSS JOIN db.s.b ORDER BY 1",
        "X-SMALL"
    );
    assert_eq!(
        report.risk_factors(),
        [
            SELECT_STAR_RISK,
            "CROSS JOIN detected - potential cartesian product",
            "DISTINCT with ORDER BY - expensive sorting operation",
            MISSING_FILTER_RISK
        ]
    );
    assert_eq!(report.complexity_score(), 14);
}

#[test]
fn test_high_cost_recommendation() {
    // score 6 on LARGE: 1.1 / 60 * 8 = 0.1467 units
    let report = analyze("SELECT * FROM db.schema.table", "LARGE");
    let last = report.recommendations().last().unwrap();
    assert!(last.starts_with("High cost query (0.147"));
}

#[test]
fn test_high_complexity_recommendation() {
    let report = analyze(
        "SELECT *, COUNT(DISTINCT x) FROM db.s.a CROSS JOIN db.s.b ORDER BY 1",
        "X-SMALL"
    );
    assert_eq!(report.complexity_level(), ComplexityLevel::High);
    assert_eq!(
        report.recommendations().last().unwrap(),
        "High complexity - test on small dataset first"
    );
}

#[test]
fn test_whitespace_query_is_empty_report() {
    let report = analyze("   \n\t", "MEDIUM");
    assert_eq!(report.complexity_score(), 0);
    assert!(report.risk_factors().is_empty());
    assert!(report.recommendations().is_empty());
    assert!(approx(report.estimated_runtime_minutes(), 0.5));
}

#[test]
fn test_empty_query_is_empty_report() {
    let report = analyze("", "MEDIUM");
    assert_eq!(report.complexity_score(), 0);
    assert_eq!(report.query_preview(), "");
}

#[test]
fn test_cost_scales_with_compute_size() {
    let query = "SELECT * FROM t CROSS JOIN u";
    let medium = analyze(query, "MEDIUM");
    let large = analyze(query, "LARGE");
    assert_eq!(medium.complexity_score(), large.complexity_score());
    assert!(approx(
        large.estimated_throughput_units(),
        medium.estimated_throughput_units() * 2.0
    ));
}

#[test]
fn test_unknown_compute_size_uses_medium_rate() {
    let report = analyze("SELECT 1", "GIGANTIC");
    assert_eq!(report.throughput_units_per_hour(), 4);
    assert_eq!(report.target_compute_size(), "GIGANTIC");
}

#[test]
fn test_compute_size_case_insensitive() {
    let report = analyze("SELECT 1", "2x-large");
    assert_eq!(report.throughput_units_per_hour(), 32);
    assert_eq!(report.target_compute_size(), "2X-LARGE");
}

#[test]
fn test_preview_truncated_at_200_chars() {
    let query = format!("SELECT {} FROM t", "x".repeat(300));
    let report = analyze(&query, "MEDIUM");
    assert_eq!(report.query_preview().chars().count(), 203);
    assert!(report.query_preview().ends_with("..."));
}

#[test]
fn test_preview_kept_when_short() {
    let report = analyze("SELECT 1", "MEDIUM");
    assert_eq!(report.query_preview(), "SELECT 1");
}

#[test]
fn test_preview_counts_characters_not_bytes() {
    let query = "é".repeat(200);
    let report = analyze(&query, "MEDIUM");
    assert_eq!(report.query_preview(), query);
}

#[test]
fn test_estimated_cost_uses_unit_price() {
    let report = analyze("SELECT 1", "MEDIUM");
    assert!(approx(
        report.estimated_cost(2.0),
        report.estimated_throughput_units() * 2.0
    ));
}

#[test]
fn test_requires_caution_thresholds() {
    use query_cost_estimator::estimator::CautionThresholds;

    let thresholds = CautionThresholds::default();
    let simple = analyze("SELECT id FROM t WHERE id = 1", "MEDIUM");
    assert!(!simple.requires_caution(&thresholds));

    // 0.5 minutes on 4X-LARGE is 1.0667 units
    let huge = analyze("SELECT id FROM t WHERE id = 1", "4X-LARGE");
    assert!(huge.requires_caution(&thresholds));
}

#[test]
fn test_complexity_level_boundaries() {
    assert_eq!(ComplexityLevel::from_score(0), ComplexityLevel::Low);
    assert_eq!(ComplexityLevel::from_score(5), ComplexityLevel::Low);
    assert_eq!(ComplexityLevel::from_score(6), ComplexityLevel::Medium);
    assert_eq!(ComplexityLevel::from_score(10), ComplexityLevel::Medium);
    assert_eq!(ComplexityLevel::from_score(11), ComplexityLevel::High);
    assert_eq!(ComplexityLevel::High.to_string(), "high");
}

#[test]
fn test_estimator_pattern_order() {
    let estimator = Estimator::default();
    assert_eq!(
        estimator.pattern_ids(),
        ["COST001", "COST002", "COST003", "COST004", "COST005", "COST006"]
    );
    assert_eq!(estimator.compute_size(), "MEDIUM");
    assert_eq!(estimator.units_per_hour(), 4);
}

#[test]
fn test_estimator_is_reusable() {
    let estimator = Estimator::new("small");
    let first = estimator.analyze("SELECT * FROM t");
    let second = estimator.analyze("SELECT * FROM t");
    assert_eq!(first, second);
}
