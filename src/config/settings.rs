use std::env;

use log::warn;

pub struct PaginateSettings {
    pub page_field: String,
    pub limit_field: String,
    pub current_page: u32,
    pub results_per_page: u32,
    pub range: u32,
    pub include_limits: bool,
    pub discard_stale_responses: bool,
}

impl Default for PaginateSettings {
    fn default() -> Self {
        Self {
            page_field: "page".to_string(),
            limit_field: "limit".to_string(),
            current_page: 1,
            results_per_page: 25,
            range: 5,
            include_limits: true,
            discard_stale_responses: false,
        }
    }
}

pub struct TransportSettings {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub min_interval_ms: u64,
    pub base_url: Option<String>,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            user_agent: concat!("page-control/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            min_interval_ms: 0, // no spacing between requests
            base_url: None,
        }
    }
}

pub struct AppConfig {
    pub paginate: PaginateSettings,
    pub transport: TransportSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            paginate: PaginateSettings::default(),
            transport: TransportSettings::default(),
        }
    }

    /// Defaults overlaid with `PAGE_CONTROL_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(user_agent) = lookup("PAGE_CONTROL_USER_AGENT") {
            self.transport.user_agent = user_agent;
        }
        if let Some(timeout) = parse_var(&lookup, "PAGE_CONTROL_TIMEOUT_SECS") {
            self.transport.timeout_secs = timeout;
        }
        if let Some(interval) = parse_var(&lookup, "PAGE_CONTROL_MIN_INTERVAL_MS") {
            self.transport.min_interval_ms = interval;
        }
        if let Some(base_url) = lookup("PAGE_CONTROL_BASE_URL").filter(|url| !url.is_empty()) {
            self.transport.base_url = Some(base_url);
        }
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a non-negative integer", key, raw);
            None
        }
    }
}
