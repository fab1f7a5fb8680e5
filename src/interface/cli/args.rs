use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::adapters::VimConfig;

/// Plugin output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single status line with performance data
    Nagios,
    /// JSON document
    Json,
}

/// Raw invocation parameters. Required values default to empty strings so that
/// validation can report them in a fixed order.
#[derive(Debug, Parser)]
#[command(
    name = "check_vsphere",
    version,
    about = "Report free CPU, memory or datastore capacity of a vSphere endpoint",
    disable_help_flag = true
)]
pub struct Args {
    /// ESXi or vCenter hostname to query
    #[arg(short = 'h', long, env = "VSPHERE_HOSTNAME", default_value = "", hide_env_values = true)]
    pub hostname: String,

    /// Username to connect with
    #[arg(short = 'u', long, env = "VSPHERE_USERNAME", default_value = "", hide_env_values = true)]
    pub username: String,

    /// Password to use with the username
    #[arg(short = 'p', long, env = "VSPHERE_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Command type (CPU, MEM, VMFS)
    #[arg(short = 'l', long, default_value = "")]
    pub command: String,

    /// Datastore name, required for VMFS
    #[arg(short = 's', long, default_value = "")]
    pub datastore: String,

    /// Warning threshold in percent of used capacity [default: 85]
    #[arg(short = 'w', long, allow_negative_numbers = true)]
    pub warning: Option<i64>,

    /// Critical threshold in percent of used capacity [default: 90]
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    pub critical: Option<i64>,

    /// Only evaluate the host system with this name (CPU, MEM)
    #[arg(short = 'e', long)]
    pub esx_host: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Nagios)]
    pub format: OutputFormat,

    /// Timeout for every request to the endpoint, in seconds
    #[arg(short = 't', long, default_value_t = VimConfig::DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Verify the endpoint's TLS certificate
    #[arg(long)]
    pub verify_tls: bool,

    /// TOML file providing hostname, username and password
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter for diagnostics written to stderr
    #[arg(long, env = "CHECK_VSPHERE_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}
