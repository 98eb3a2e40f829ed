use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Query Cost Estimator - Heuristic cost and risk checks for warehouse SQL
#[derive(Parser, Debug)]
#[command(name = "query-cost-estimator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate cost and risk of SQL queries
    Estimate {
        /// SQL files to analyze (use - for stdin)
        #[arg(required = true)]
        queries: Vec<PathBuf>,

        /// Compute size used for the cost estimate (X-SMALL .. 4X-LARGE)
        #[arg(short = 'w', long, env = "QUERY_COST_COMPUTE_SIZE")]
        compute_size: Option<String>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Skip table statistics lookup
        #[arg(long)]
        no_table_stats: bool,

        /// Table statistics catalog file (yaml, json or toml)
        #[arg(long, env = "QUERY_COST_STATS_FILE")]
        stats_file: Option<PathBuf>,

        /// Table metadata service base URL
        #[arg(long, env = "QUERY_COST_STATS_URL")]
        stats_url: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },
    /// List table references found in a SQL file
    Tables {
        /// SQL file to scan (use - for stdin)
        query: PathBuf,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format
    },
    /// Show compute sizes and their hourly throughput-unit rates
    Sizes {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
