//! Configuration types for the install pipeline

use std::path::PathBuf;
use std::time::Duration;

use crate::version::ProductVersion;

/// What to install and where.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Root directory the environment is provisioned into
    pub root: PathBuf,
    /// Product version to install
    pub version: ProductVersion,
    /// Also install the sample application package
    pub include_sample: bool,
    /// Also install the legacy-compatibility package
    pub include_legacy_compat: bool,
}

impl InstallConfig {
    pub fn new<P: Into<PathBuf>>(root: P, version: ProductVersion) -> Self {
        Self {
            root: root.into(),
            version,
            include_sample: false,
            include_legacy_compat: false,
        }
    }

    pub fn with_sample(mut self, include: bool) -> Self {
        self.include_sample = include;
        self
    }

    pub fn with_legacy_compat(mut self, include: bool) -> Self {
        self.include_legacy_compat = include;
        self
    }
}

/// Configuration for the archive source client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL of the archive host. Overridable so tests can point the
    /// client at a local mock server.
    pub base_url: String,
    pub user_agent: String,
    /// Whole-request timeout; archives can be large, so this is generous.
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://github.com".to_string(),
            user_agent: concat!("installer/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(600),
        }
    }
}

impl FetchConfig {
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
