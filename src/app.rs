//! Application logic for the Query Cost Estimator CLI.
//!
//! This module contains the core application logic separated from the main
//! entry point to enable testing.

use std::{
    fs::read_to_string,
    io::{self, Read},
    path::PathBuf,
    time::Duration
};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    cli::Format,
    compute::ComputeSize,
    config::Config,
    error::{AppResult, empty_input_error, file_read_error},
    estimator::{Estimator, extract_table_references},
    output::{
        OutputFormat, OutputOptions, QueryEstimate, format_compute_sizes, format_estimates,
        format_table_references
    },
    stats::{StatsClient, StatsSource}
};

/// Exit code signalling a query that needs care before running
pub const CAUTION_EXIT_CODE: i32 = 2;

/// Parameters for the estimate command
#[derive(Debug, Clone)]
pub struct EstimateParams {
    pub queries:        Vec<String>,
    pub compute_size:   Option<String>,
    pub output_format:  Format,
    pub no_table_stats: bool,
    pub stats_file:     Option<PathBuf>,
    pub stats_url:      Option<String>,
    pub no_color:       bool
}

/// Result of an estimate run
#[derive(Debug, Clone)]
pub struct EstimateResult {
    pub exit_code: i32,
    pub output:    String,
    pub estimates: Vec<QueryEstimate>
}

/// Convert CLI format to internal OutputFormat
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}

/// Create output options from parameters
pub fn create_output_options(format: Format, no_color: bool, unit_price: f64) -> OutputOptions {
    OutputOptions {
        format: convert_format(format),
        colored: !no_color,
        unit_price
    }
}

/// Read a query from file or stdin, rejecting blank input
pub fn read_query_input(path: &str) -> AppResult<String> {
    let query = if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        buffer
    } else {
        read_to_string(path).map_err(|e| file_read_error(path, e))?
    };
    if query.trim().is_empty() {
        return Err(empty_input_error(display_source(path)));
    }
    Ok(query)
}

fn display_source(path: &str) -> &str {
    if path == "-" { "stdin" } else { path }
}

/// Get effective compute size label
pub fn get_effective_compute_size(cli_size: Option<String>, config_size: Option<String>) -> String {
    cli_size
        .or(config_size)
        .unwrap_or_else(|| ComputeSize::default().label().to_string())
}

/// Resolve the statistics source; CLI flags override configuration
pub fn resolve_stats_source(params: &EstimateParams, config: &Config) -> Option<StatsSource> {
    if params.no_table_stats {
        return None;
    }
    let mut stats = config.stats.clone();
    if params.stats_file.is_some() || params.stats_url.is_some() {
        stats.file = params.stats_file.clone();
        stats.url = params.stats_url.clone();
    }
    StatsSource::from_config(&stats, &config.retry)
}

/// Calculate exit code from the caution flags of all estimates
pub fn calculate_exit_code(estimates: &[QueryEstimate]) -> i32 {
    if estimates.iter().any(|e| e.caution) {
        CAUTION_EXIT_CODE
    } else {
        0
    }
}

/// Run the estimate command
pub async fn run_estimate(params: EstimateParams, config: Config) -> AppResult<EstimateResult> {
    let compute_size = get_effective_compute_size(
        params.compute_size.clone(),
        config.estimator.compute_size.clone()
    );
    if ComputeSize::lookup(&compute_size).is_none() {
        debug!(compute_size = %compute_size, "unknown compute size, using MEDIUM rate");
    }
    let estimator = Estimator::new(&compute_size);

    let inputs = params
        .queries
        .iter()
        .map(|path| -> AppResult<(String, String)> {
            Ok((display_source(path).to_string(), read_query_input(path)?))
        })
        .collect::<AppResult<Vec<_>>>()?;
    info!(
        inputs = inputs.len(),
        compute_size = estimator.compute_size(),
        "estimating query cost"
    );

    let mut estimates: Vec<QueryEstimate> = inputs
        .par_iter()
        .map(|(source, query)| {
            let report = estimator.analyze(query);
            QueryEstimate {
                source: source.clone(),
                caution: report.requires_caution(&config.caution),
                report,
                tables: None
            }
        })
        .collect();

    match resolve_stats_source(&params, &config) {
        Some(source) => {
            let pb = source.is_remote().then(|| {
                let pb = ProgressBar::new_spinner();
                if let Ok(style) =
                    ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
                {
                    pb.set_style(style);
                }
                pb.set_message("Fetching table statistics...");
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            });
            let client = StatsClient::new(source);
            for (estimate, (_, query)) in estimates.iter_mut().zip(&inputs) {
                let references = extract_table_references(query);
                if references.is_empty() {
                    continue;
                }
                estimate.tables = Some(client.lookup_all(&references).await);
            }
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }
        }
        None => debug!("table statistics lookup skipped")
    }

    let output_opts =
        create_output_options(params.output_format, params.no_color, config.estimator.unit_price);
    let output = format_estimates(&estimates, &output_opts);
    Ok(EstimateResult {
        exit_code: calculate_exit_code(&estimates),
        output,
        estimates
    })
}

/// Run the tables command
pub fn run_tables(path: &str, format: Format) -> AppResult<String> {
    let query = read_query_input(path)?;
    let references = extract_table_references(&query);
    let opts = create_output_options(format, true, 0.0);
    Ok(format_table_references(&references, &opts))
}

/// Run the sizes command
pub fn run_sizes(format: Format) -> String {
    format_compute_sizes(&create_output_options(format, true, 0.0))
}
