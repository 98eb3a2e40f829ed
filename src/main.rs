//! # Query Cost Estimator
//!
//! Heuristic cost and risk estimation for SQL queries before they are sent
//! to a cloud data warehouse.
//!
//! `query-cost-estimator` scans SQL text for patterns that are known to be
//! expensive on a warehouse (unbounded projections, cross joins, unfiltered
//! reads of fully qualified tables, nested subqueries, window functions),
//! turns them into a complexity score and converts that score into an
//! estimated runtime and throughput-unit cost for a chosen compute size.
//!
//! The analysis is purely lexical. No SQL is parsed and no warehouse
//! connection is opened.
//!
//! # Quick Start
//!
//! ```bash
//! # Estimate a query on the default MEDIUM compute size
//! query-cost-estimator estimate query.sql
//!
//! # Price it for a larger warehouse
//! query-cost-estimator estimate query.sql --compute-size 2x-large
//!
//! # Read from stdin and emit JSON
//! echo "SELECT * FROM db.sales.orders" | query-cost-estimator estimate - -f json
//!
//! # Attach table sizes from a catalog file
//! query-cost-estimator estimate query.sql --stats-file catalog.yaml
//!
//! # List referenced tables
//! query-cost-estimator tables query.sql
//! ```
//!
//! # Compute Sizes
//!
//! | Size | Units/hour |
//! |------|------------|
//! | X-SMALL | 1 |
//! | SMALL | 2 |
//! | MEDIUM | 4 |
//! | LARGE | 8 |
//! | X-LARGE | 16 |
//! | 2X-LARGE | 32 |
//! | 3X-LARGE | 64 |
//! | 4X-LARGE | 128 |
//!
//! Unknown sizes are priced at the MEDIUM rate.
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Error (unreadable input, empty query, invalid configuration)
//! - `2` - Estimated cost above 0.5 units or complexity above 15; proceed
//!   with caution
//!
//! # Logging
//!
//! Diagnostics go to stderr through `tracing`. The default level is `warn`;
//! set `RUST_LOG=query_cost_estimator=debug` for more detail.

use std::process;

use clap::Parser;
use query_cost_estimator::{
    app::{EstimateParams, run_estimate, run_sizes, run_tables},
    cli::{Cli, Commands},
    config::Config,
    error::AppResult
};
use tokio::main;
use tracing_subscriber::EnvFilter;

#[main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e.render_message());
            process::exit(1);
        }
    }
}

async fn run() -> AppResult<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Estimate {
            queries,
            compute_size,
            output_format,
            no_table_stats,
            stats_file,
            stats_url,
            no_color
        } => {
            let config = Config::load()?;
            let params = EstimateParams {
                queries: queries
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect(),
                compute_size,
                output_format,
                no_table_stats,
                stats_file,
                stats_url,
                no_color
            };
            let result = run_estimate(params, config).await?;
            println!("{}", result.output);
            Ok(result.exit_code)
        }
        Commands::Tables {
            query,
            output_format
        } => {
            let output = run_tables(&query.to_string_lossy(), output_format)?;
            print!("{}", output);
            Ok(0)
        }
        Commands::Sizes {
            output_format
        } => {
            print!("{}", run_sizes(output_format));
            Ok(0)
        }
    }
}
