use compact_str::CompactString;
use indexmap::{IndexMap, IndexSet};
use query_cost_estimator::{
    estimator::analyze,
    output::{
        EstimateView, OutputFormat, OutputOptions, QueryEstimate, format_compute_sizes,
        format_estimates, format_table_references, group_thousands
    },
    stats::{TableStats, TableStatsEntry}
};

fn plain(format: OutputFormat) -> OutputOptions {
    OutputOptions {
        format,
        colored: false,
        unit_price: 2.0
    }
}

fn estimate(query: &str, size: &str) -> QueryEstimate {
    QueryEstimate {
        source:  "query.sql".to_string(),
        report:  analyze(query, size),
        tables:  None,
        caution: false
    }
}

#[test]
fn test_output_format_default() {
    assert!(matches!(OutputFormat::default(), OutputFormat::Text));
}

#[test]
fn test_output_options_default() {
    let opts = OutputOptions::default();
    assert!(matches!(opts.format, OutputFormat::Text));
    assert!(opts.colored);
    assert_eq!(opts.unit_price, 2.0);
}

#[test]
fn test_text_report_sections() {
    let output = format_estimates(
        &[estimate("SELECT * FROM db.schema.table", "MEDIUM")],
        &plain(OutputFormat::Text)
    );
    assert!(output.contains("=== QUERY COST ANALYSIS ==="));
    assert!(output.contains("Source: query.sql"));
    assert!(output.contains("   SELECT * FROM db.schema.table"));
    assert!(output.contains("Compute size: MEDIUM (4 units/hour)"));
    assert!(output.contains("Estimated runtime: 1.1 minutes"));
    assert!(output.contains("Estimated throughput units: 0.0733"));
    assert!(output.contains("Estimated cost: $0.1467"));
    assert!(output.contains("Complexity score: 6/20"));
    assert!(output.contains("Medium complexity - monitor performance"));
    assert!(output.contains("Risk Factors:"));
    assert!(output.contains("   • SELECT * detected - may scan unnecessary columns"));
    assert!(output.contains("Recommendations:"));
    assert!(!output.contains("proceed with caution"));
}

#[test]
fn test_text_report_no_risks() {
    let output = format_estimates(
        &[estimate("SELECT id FROM t WHERE id = 1", "MEDIUM")],
        &plain(OutputFormat::Text)
    );
    assert!(output.contains("No major risk factors detected"));
    assert!(output.contains("Low complexity - should run quickly"));
    assert!(!output.contains("Recommendations:"));
}

#[test]
fn test_text_report_high_complexity() {
    let output = format_estimates(
        &[estimate(
            "SELECT *, COUNT(DISTINCT x) FROM db.s.a CROSS JOIN db.s.b ORDER BY 1",
            "MEDIUM"
        )],
        &plain(OutputFormat::Text)
    );
    assert!(output.contains("High complexity - test carefully"));
}

#[test]
fn test_text_report_tables() {
    let mut e = estimate("SELECT id FROM db.s.orders JOIN db.s.users ON true", "MEDIUM");
    let mut tables = IndexMap::new();
    tables.insert(
        CompactString::from("db.s.orders"),
        TableStatsEntry::Available(TableStats {
            row_count: 1_234_567,
            bytes:     2_147_483_648
        })
    );
    tables.insert(CompactString::from("db.s.users"), TableStatsEntry::Unavailable);
    e.tables = Some(tables);

    let output = format_estimates(&[e], &plain(OutputFormat::Text));
    assert!(output.contains("Referenced Tables:"));
    assert!(output.contains("   • db.s.orders: 1,234,567 rows, 2 GB"));
    assert!(output.contains("   • db.s.users: Stats unavailable"));
}

#[test]
fn test_text_report_caution_line() {
    let mut e = estimate("SELECT 1", "4X-LARGE");
    e.caution = true;
    let output = format_estimates(&[e], &plain(OutputFormat::Text));
    assert!(output.contains("High cost/complexity query - proceed with caution!"));
}

#[test]
fn test_text_report_multiple_inputs() {
    let output = format_estimates(
        &[estimate("SELECT 1", "MEDIUM"), estimate("SELECT 2", "SMALL")],
        &plain(OutputFormat::Text)
    );
    assert_eq!(output.matches("=== QUERY COST ANALYSIS ===").count(), 2);
}

#[test]
fn test_json_includes_derived_fields() {
    let output = format_estimates(
        &[estimate("SELECT * FROM db.schema.table", "MEDIUM")],
        &plain(OutputFormat::Json)
    );
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    let report = &value[0];
    assert_eq!(report["complexity_score"], 6);
    assert_eq!(report["complexity_level"], "Medium");
    assert_eq!(report["target_compute_size"], "MEDIUM");
    assert_eq!(report["throughput_units_per_hour"], 4);
    assert!((report["estimated_runtime_minutes"].as_f64().unwrap() - 1.1).abs() < 1e-9);
    assert!(report["estimated_throughput_units"].as_f64().unwrap() > 0.07);
    assert_eq!(report["risk_factors"].as_array().unwrap().len(), 2);
    assert!(report.get("tables").is_none());
}

#[test]
fn test_yaml_output() {
    let output = format_estimates(&[estimate("SELECT 1", "LARGE")], &plain(OutputFormat::Yaml));
    assert!(output.contains("target_compute_size: LARGE"));
    assert!(output.contains("complexity_score: 0"));
}

#[test]
fn test_estimate_view_cost_uses_price() {
    let e = estimate("SELECT 1", "MEDIUM");
    let view = EstimateView::new(&e, 10.0);
    assert!((view.estimated_cost - view.estimated_throughput_units * 10.0).abs() < 1e-12);
}

#[test]
fn test_table_references_text() {
    let refs: IndexSet<CompactString> = ["a.b", "c"].into_iter().map(CompactString::from).collect();
    assert_eq!(
        format_table_references(&refs, &plain(OutputFormat::Text)),
        "a.b\nc\n"
    );
}

#[test]
fn test_table_references_empty() {
    let refs = IndexSet::new();
    assert!(format_table_references(&refs, &plain(OutputFormat::Text)).contains("No table references"));
}

#[test]
fn test_table_references_json() {
    let refs: IndexSet<CompactString> = ["x.y"].into_iter().map(CompactString::from).collect();
    let output = format_table_references(&refs, &plain(OutputFormat::Json));
    let value: Vec<String> = serde_json::from_str(&output).unwrap();
    assert_eq!(value, ["x.y"]);
}

#[test]
fn test_compute_sizes_text() {
    let output = format_compute_sizes(&plain(OutputFormat::Text));
    assert_eq!(output.lines().count(), 8);
    assert!(output.contains("MEDIUM"));
    assert!(output.contains("(default)"));
}

#[test]
fn test_compute_sizes_json() {
    let output = format_compute_sizes(&plain(OutputFormat::Json));
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value[7]["size"], "4X-LARGE");
    assert_eq!(value[7]["units_per_hour"], 128);
}

#[test]
fn test_group_thousands() {
    assert_eq!(group_thousands(0), "0");
    assert_eq!(group_thousands(999), "999");
    assert_eq!(group_thousands(1000), "1,000");
    assert_eq!(group_thousands(1_234_567), "1,234,567");
}
