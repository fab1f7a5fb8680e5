mod client;
mod envelope;
mod response;
mod xml;

use std::time::Duration;

pub use client::VimSession;

/// Transport settings for the vSphere session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VimConfig {
    pub timeout: Duration,
    pub verify_tls: bool,
}

impl VimConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new(timeout: Duration, verify_tls: bool) -> Self {
        Self { timeout, verify_tls }
    }
}

impl Default for VimConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS), false)
    }
}
