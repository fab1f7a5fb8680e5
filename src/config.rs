use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::adapters::VimConfig;
use crate::domain::{CommandKind, ObjectKind, Thresholds, UnknownCommand};
use crate::interface::cli::{Args, OutputFormat};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Must supply the {0}")]
    MissingField(&'static str),

    #[error("Invalid {name} threshold {value}: must be a percentage between 0 and 100")]
    InvalidThreshold { name: &'static str, value: i64 },

    #[error("Warning threshold {warning} must not exceed critical threshold {critical}")]
    ThresholdOrder { warning: u8, critical: u8 },

    #[error("Invalid command {given}, valid choices [{choices}]")]
    InvalidCommand { given: String, choices: String },

    #[error("Pass storage name for {0} option using (-s | --datastore)")]
    MissingDatastore(CommandKind),

    #[error("The host filter (-e | --esx-host) does not apply to {0}")]
    HostFilterNotApplicable(CommandKind),

    #[error("Invalid endpoint URL {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Cannot read config file {path}: {reason}")]
    ConfigFile { path: PathBuf, reason: String },
}

impl ValidationError {
    /// Invalid command and missing datastore keep their historical exit code 2
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidCommand { .. } | Self::MissingDatastore(_) => 2,
            _ => 3,
        }
    }
}

/// Password that never shows up in Debug output
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"********\"")
    }
}

/// Connection settings that may be kept out of the command line
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConnectionFile {
    hostname: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl ConnectionFile {
    fn load(path: &Path) -> Result<Self, ValidationError> {
        let config_error = |reason: String| ValidationError::ConfigFile {
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        toml::from_str(&content).map_err(|e| config_error(e.to_string()))
    }
}

/// Check configuration, resolved once and read-only afterwards
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Url,
    pub username: String,
    pub password: Secret,
    pub command: CommandKind,
    pub datastore: Option<String>,
    pub host_system: Option<String>,
    pub thresholds: Thresholds,
    pub format: OutputFormat,
    pub session: VimConfig,
}

/// Command line value if given, else the config file value
fn pick(cli: String, file: Option<String>) -> String {
    if cli.is_empty() {
        file.unwrap_or_default()
    } else {
        cli
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn threshold(name: &'static str, value: Option<i64>, default: u8) -> Result<u8, ValidationError> {
    let Some(value) = value else {
        return Ok(default);
    };
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or(ValidationError::InvalidThreshold { name, value })
}

impl Config {
    /// Validate raw arguments; required fields are checked in a fixed order so the
    /// first missing one is reported
    pub fn resolve(args: Args) -> Result<Self, ValidationError> {
        let file = match &args.config {
            Some(path) => ConnectionFile::load(path)?,
            None => ConnectionFile::default(),
        };

        let hostname = pick(args.hostname, file.hostname);
        if hostname.is_empty() {
            return Err(ValidationError::MissingField("hostname"));
        }

        let warning = threshold("warning", args.warning, Thresholds::DEFAULT_WARNING)?;
        let critical = threshold("critical", args.critical, Thresholds::DEFAULT_CRITICAL)?;

        let username = pick(args.username, file.username);
        if username.is_empty() {
            return Err(ValidationError::MissingField("username"));
        }

        let password = pick(args.password, file.password);
        if password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }

        if args.command.is_empty() {
            return Err(ValidationError::MissingField("command"));
        }

        if warning > critical {
            return Err(ValidationError::ThresholdOrder { warning, critical });
        }

        let command: CommandKind = args.command.parse().map_err(|UnknownCommand(given)| {
            ValidationError::InvalidCommand {
                given,
                choices: CommandKind::choices(),
            }
        })?;

        let datastore = non_empty(Some(args.datastore));
        if command == CommandKind::Vmfs && datastore.is_none() {
            return Err(ValidationError::MissingDatastore(command));
        }

        let host_system = non_empty(args.esx_host);
        if host_system.is_some() && command.object_kind() != ObjectKind::HostSystem {
            return Err(ValidationError::HostFilterNotApplicable(command));
        }

        let url = normalize_endpoint(&hostname);
        let endpoint = Url::parse(&url).map_err(|e| ValidationError::InvalidEndpoint {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            endpoint,
            username,
            password: Secret::new(password),
            command,
            datastore,
            host_system,
            thresholds: Thresholds::new(warning, critical),
            format: args.format,
            session: VimConfig::new(Duration::from_secs(args.timeout), args.verify_tls),
        })
    }
}

/// `<scheme>://<rest>`, both sides non-empty and on a single line
static SCHEME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^.+://.+$").expect("valid endpoint pattern"));

/// Turn a bare host name into the SDK URL; anything shaped like `<scheme>://<rest>` is kept
pub fn normalize_endpoint(host: &str) -> String {
    if SCHEME.is_match(host) {
        host.to_string()
    } else {
        format!("https://{}/sdk", host)
    }
}
