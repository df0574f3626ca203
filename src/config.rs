// ⚙️ Configuration
//
// Command-line flags with environment fallbacks, shared by both binaries.
// Precedence: flag > env var > default.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_DATABASE: &str = "agro.db";
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_ARABLE_LABEL: &str = "Arable Area";
pub const DEFAULT_VEGETATION_LABEL: &str = "Vegetation Area";

/// Bucket names of the land-use chart
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ReportLabels {
    #[arg(
        long = "arable-label",
        env = "AGRO_ARABLE_LABEL",
        value_name = "TEXT",
        default_value = DEFAULT_ARABLE_LABEL,
        help = "Label of the arable bucket in the land-use chart"
    )]
    pub arable: String,

    #[arg(
        long = "vegetation-label",
        env = "AGRO_VEGETATION_LABEL",
        value_name = "TEXT",
        default_value = DEFAULT_VEGETATION_LABEL,
        help = "Label of the vegetation bucket in the land-use chart"
    )]
    pub vegetation: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        ReportLabels {
            arable: DEFAULT_ARABLE_LABEL.to_string(),
            vegetation: DEFAULT_VEGETATION_LABEL.to_string(),
        }
    }
}

// ============================================================================
// agro-server
// ============================================================================

#[derive(Parser, Debug, Clone)]
#[command(name = "agro-server", about = "Agricultural records HTTP API", version)]
pub struct ServerConfig {
    #[arg(
        long,
        env = "AGRO_DATABASE",
        value_name = "FILE",
        default_value = DEFAULT_DATABASE,
        help = "SQLite database file"
    )]
    pub database: PathBuf,

    #[arg(
        long,
        env = "AGRO_BIND",
        value_name = "ADDR",
        default_value = DEFAULT_BIND,
        help = "Address the HTTP server listens on"
    )]
    pub bind: SocketAddr,

    #[arg(
        long,
        help = "Keep records in memory instead of SQLite (lost on exit)"
    )]
    pub memory: bool,

    #[command(flatten)]
    pub labels: ReportLabels,
}

// ============================================================================
// agro-records
// ============================================================================

#[derive(Parser, Debug, Clone)]
#[command(name = "agro-records", about = "Agricultural records toolkit", version)]
pub struct Cli {
    #[arg(
        long,
        env = "AGRO_DATABASE",
        value_name = "FILE",
        default_value = DEFAULT_DATABASE,
        global = true,
        help = "SQLite database file"
    )]
    pub database: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the database schema (idempotent)
    Init,

    /// Validate a CPF/CNPJ and print its canonical form
    CheckDocument {
        /// Document digits, with or without punctuation
        document: String,
    },

    /// Print the dashboard summary and charts as JSON
    Report {
        #[command(flatten)]
        labels: ReportLabels,
    },
}
