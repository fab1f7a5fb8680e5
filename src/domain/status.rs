use std::fmt;

use serde::Serialize;

/// Plugin state following the Nagios exit code convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckState {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl CheckState {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Used capacity percentages at which a check turns WARNING or CRITICAL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    pub warning: u8,
    pub critical: u8,
}

impl Thresholds {
    pub const DEFAULT_WARNING: u8 = 85;
    pub const DEFAULT_CRITICAL: u8 = 90;

    pub fn new(warning: u8, critical: u8) -> Self {
        Self { warning, critical }
    }

    /// Classify a free percentage; an undefined percentage is UNKNOWN
    pub fn classify(&self, free_percent: Option<f64>) -> CheckState {
        let Some(free_percent) = free_percent else {
            return CheckState::Unknown;
        };
        if !free_percent.is_finite() {
            return CheckState::Unknown;
        }

        let used_percent = 100.0 - free_percent;
        if used_percent >= self.critical as f64 {
            CheckState::Critical
        } else if used_percent >= self.warning as f64 {
            CheckState::Warning
        } else {
            CheckState::Ok
        }
    }

    /// Free percentage at or below which the check is WARNING
    pub fn warning_free(&self) -> u8 {
        100 - self.warning
    }

    /// Free percentage at or below which the check is CRITICAL
    pub fn critical_free(&self) -> u8 {
        100 - self.critical
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WARNING, Self::DEFAULT_CRITICAL)
    }
}
