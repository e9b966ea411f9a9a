//! Connection settings shared by the transport and the media retriever.

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.groupme.com/v3";
pub const DEFAULT_V4_BASE: &str = "https://api.groupme.com/v4";
pub const DEFAULT_FILE_BASE: &str = "https://file.groupme.com";

/// Access token and endpoint bases.
///
/// Read-only once built; clone it freely across tasks.
#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub api_base: String,
    pub v4_base: String,
    pub file_base: String,
    /// Per-request deadline applied to the HTTP client. `None` leaves
    /// requests unbounded.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Config {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            v4_base: DEFAULT_V4_BASE.to_string(),
            file_base: DEFAULT_FILE_BASE.to_string(),
            timeout: None,
            user_agent: format!("gmhistory/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = trim_base(base.into());
        self
    }

    pub fn with_v4_base(mut self, base: impl Into<String>) -> Self {
        self.v4_base = trim_base(base.into());
        self
    }

    pub fn with_file_base(mut self, base: impl Into<String>) -> Self {
        self.file_base = trim_base(base.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the HTTP client every request goes through.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

// Never print the token.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base", &self.api_base)
            .field("v4_base", &self.v4_base)
            .field("file_base", &self.file_base)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}
