use colored::{ColoredString, Colorize};
use compact_str::CompactString;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::{
    compute::{COMPUTE_SIZES, ComputeSize},
    estimator::{AnalysisReport, ComplexityLevel},
    stats::TableStatsEntry
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:     OutputFormat,
    pub colored:    bool,
    /// Price per throughput unit used for the monetary estimate
    pub unit_price: f64
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:     OutputFormat::Text,
            colored:    true,
            unit_price: 2.0
        }
    }
}

/// One analyzed input together with its optional table statistics
#[derive(Debug, Clone)]
pub struct QueryEstimate {
    /// File path or `stdin`
    pub source:  String,
    pub report:  AnalysisReport,
    pub tables:  Option<IndexMap<CompactString, TableStatsEntry>>,
    pub caution: bool
}

/// Serializable view of an estimate, including derived figures
#[derive(Debug, Serialize)]
pub struct EstimateView<'a> {
    pub source:                     &'a str,
    pub query_preview:              &'a str,
    pub target_compute_size:        &'a str,
    pub throughput_units_per_hour:  u32,
    pub complexity_score:           u32,
    pub complexity_level:           ComplexityLevel,
    pub risk_factors:               &'a [String],
    pub recommendations:            &'a [String],
    pub estimated_runtime_minutes:  f64,
    pub estimated_throughput_units: f64,
    pub estimated_cost:             f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables:                     Option<&'a IndexMap<CompactString, TableStatsEntry>>,
    pub caution:                    bool
}

impl<'a> EstimateView<'a> {
    pub fn new(estimate: &'a QueryEstimate, unit_price: f64) -> Self {
        let report = &estimate.report;
        Self {
            source:                     &estimate.source,
            query_preview:              report.query_preview(),
            target_compute_size:        report.target_compute_size(),
            throughput_units_per_hour:  report.throughput_units_per_hour(),
            complexity_score:           report.complexity_score(),
            complexity_level:           report.complexity_level(),
            risk_factors:               report.risk_factors(),
            recommendations:            report.recommendations(),
            estimated_runtime_minutes:  report.estimated_runtime_minutes(),
            estimated_throughput_units: report.estimated_throughput_units(),
            estimated_cost:             report.estimated_cost(unit_price),
            tables:                     estimate.tables.as_ref(),
            caution:                    estimate.caution
        }
    }
}

#[derive(Debug, Serialize)]
struct ComputeSizeView {
    size:           &'static str,
    units_per_hour: u32
}

fn paint(text: &str, colored: bool, style: impl Fn(&str) -> ColoredString) -> String {
    if colored { style(text).to_string() } else { text.to_string() }
}

/// Format estimates in the requested output format
pub fn format_estimates(estimates: &[QueryEstimate], opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => {
            let views: Vec<_> = estimates
                .iter()
                .map(|e| EstimateView::new(e, opts.unit_price))
                .collect();
            serde_json::to_string_pretty(&views).unwrap_or_default()
        }
        OutputFormat::Yaml => {
            let views: Vec<_> = estimates
                .iter()
                .map(|e| EstimateView::new(e, opts.unit_price))
                .collect();
            serde_yaml::to_string(&views).unwrap_or_default()
        }
        OutputFormat::Text => estimates
            .iter()
            .map(|e| format_text_estimate(e, opts))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn format_text_estimate(estimate: &QueryEstimate, opts: &OutputOptions) -> String {
    let report = &estimate.report;
    let colored = opts.colored;
    let mut out = String::new();

    out.push_str(&paint("=== QUERY COST ANALYSIS ===", colored, |s| s.bold()));
    out.push('\n');
    out.push_str(&format!("Source: {}\n", estimate.source));

    out.push('\n');
    out.push_str(&paint("Query Preview:", colored, |s| s.cyan().bold()));
    out.push('\n');
    out.push_str(&format!("   {}\n", report.query_preview()));

    out.push('\n');
    out.push_str(&paint("Cost Estimation:", colored, |s| s.cyan().bold()));
    out.push('\n');
    out.push_str(&format!(
        "   Compute size: {} ({} units/hour)\n",
        report.target_compute_size(),
        report.throughput_units_per_hour()
    ));
    out.push_str(&format!(
        "   Estimated runtime: {:.1} minutes\n",
        report.estimated_runtime_minutes()
    ));
    out.push_str(&format!(
        "   Estimated throughput units: {:.4}\n",
        report.estimated_throughput_units()
    ));
    out.push_str(&format!(
        "   Estimated cost: ${:.4}\n",
        report.estimated_cost(opts.unit_price)
    ));

    out.push('\n');
    out.push_str(&paint("Complexity Analysis:", colored, |s| s.cyan().bold()));
    out.push('\n');
    out.push_str(&format!(
        "   Complexity score: {}/20\n",
        report.complexity_score()
    ));
    let level_line = match report.complexity_level() {
        ComplexityLevel::Low => paint("Low complexity - should run quickly", colored, |s| s.green()),
        ComplexityLevel::Medium => {
            paint("Medium complexity - monitor performance", colored, |s| s.yellow())
        }
        ComplexityLevel::High => paint("High complexity - test carefully", colored, |s| s.red())
    };
    out.push_str(&format!("   {}\n", level_line));

    out.push('\n');
    if report.risk_factors().is_empty() {
        out.push_str(&paint("No major risk factors detected", colored, |s| s.green()));
        out.push('\n');
    } else {
        out.push_str(&paint("Risk Factors:", colored, |s| s.yellow().bold()));
        out.push('\n');
        for risk in report.risk_factors() {
            out.push_str(&format!("   • {}\n", risk));
        }
    }

    if !report.recommendations().is_empty() {
        out.push('\n');
        out.push_str(&paint("Recommendations:", colored, |s| s.cyan().bold()));
        out.push('\n');
        for rec in report.recommendations() {
            out.push_str(&format!("   • {}\n", rec));
        }
    }

    if let Some(tables) = &estimate.tables
        && !tables.is_empty()
    {
        out.push('\n');
        out.push_str(&paint("Referenced Tables:", colored, |s| s.cyan().bold()));
        out.push('\n');
        for (table, entry) in tables {
            match entry {
                TableStatsEntry::Available(stats) => out.push_str(&format!(
                    "   • {}: {} rows, {} GB\n",
                    table,
                    group_thousands(stats.row_count),
                    stats.size_gb()
                )),
                TableStatsEntry::Unavailable => {
                    out.push_str(&format!("   • {}: Stats unavailable\n", table))
                }
            }
        }
    }

    if estimate.caution {
        out.push('\n');
        out.push_str(&paint(
            "High cost/complexity query - proceed with caution!",
            colored,
            |s| s.red().bold()
        ));
        out.push('\n');
    }

    out
}

/// Format extracted table references
pub fn format_table_references(references: &IndexSet<CompactString>, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(references).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(references).unwrap_or_default(),
        OutputFormat::Text => {
            if references.is_empty() {
                return String::from("No table references found\n");
            }
            let mut out = String::new();
            for reference in references {
                out.push_str(reference);
                out.push('\n');
            }
            out
        }
    }
}

/// Format the compute size rate table
pub fn format_compute_sizes(opts: &OutputOptions) -> String {
    let views: Vec<ComputeSizeView> = COMPUTE_SIZES
        .iter()
        .map(|size| ComputeSizeView {
            size:           size.label(),
            units_per_hour: size.units_per_hour()
        })
        .collect();
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(&views).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(&views).unwrap_or_default(),
        OutputFormat::Text => {
            let mut out = String::new();
            for size in COMPUTE_SIZES {
                let marker = if size == ComputeSize::default() { " (default)" } else { "" };
                out.push_str(&format!(
                    "{:<10} {:>4} units/hour{}\n",
                    size.label(),
                    size.units_per_hour(),
                    marker
                ));
            }
            out
        }
    }
}

/// Render an integer with comma thousands separators
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
