use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ltc")]
#[command(about = "Lattice CLI for application status and placement", long_about = None)]
pub struct Args {
    /// Receptor API URL
    #[arg(
        long,
        env = "LATTICE_RECEPTOR_URL",
        default_value = "http://receptor.192.168.11.11.xip.io"
    )]
    pub receptor_url: String,

    /// Receptor username (HTTP basic auth)
    #[arg(long, env = "LATTICE_USERNAME")]
    pub username: Option<String>,

    /// Receptor password (HTTP basic auth)
    #[arg(long, env = "LATTICE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    #[command(flatten)]
    pub defaults: TemplateArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Defaults applied to every desired LRP before the JSON document is merged.
#[derive(Debug, clap::Args)]
pub struct TemplateArgs {
    /// Scheduling domain
    #[arg(long, env = "LATTICE_DOMAIN", default_value = "lattice")]
    pub domain: String,

    #[arg(long, default_value = "lattice")]
    pub stack: String,

    #[arg(long, default_value_t = 1)]
    pub instances: u32,

    #[arg(long, default_value_t = 128)]
    pub memory_mb: u32,

    #[arg(long, default_value_t = 1024)]
    pub disk_mb: u32,

    #[arg(long, default_value_t = 100)]
    pub cpu_weight: u32,

    /// Seconds to wait for an instance to become healthy
    #[arg(long, default_value_t = 60)]
    pub start_timeout: u32,

    /// Exposed container ports (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "8080")]
    pub ports: Vec<u16>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all applications running on Lattice
    #[command(visible_alias = "li")]
    List,
    /// Show detailed status of an application and its instances
    #[command(visible_alias = "st")]
    Status {
        /// Application name (process guid)
        app_name: Option<String>,
    },
    /// Visualize the workload distribution across the Lattice cells
    #[command(visible_alias = "v")]
    Visualize {
        /// Refresh rate, e.g. "500ms" or "2s"; omit to draw once
        #[arg(short, long, value_parser = humantime::parse_duration)]
        rate: Option<Duration>,
    },
    /// Create a desired LRP from a JSON document
    #[command(name = "create-from-json", visible_alias = "cfj")]
    CreateFromJson {
        /// Path to the JSON file
        path: Option<PathBuf>,
    },
}
