use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeProfile {
    #[default]
    Development,
    Production,
}

/// Environment-driven adapter configuration.
///
/// The production profile refuses to fall back to the deterministic
/// in-memory provider; development and test runs use it by default.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub runtime_profile: RuntimeProfile,
    /// JSON-RPC endpoint that proxies the injected provider, if any.
    pub eip1193_proxy_url: Option<String>,
    pub provider_timeout_ms: u64,
    pub confirmation_timeout_ms: u64,
    pub confirmation_poll_interval_ms: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Development,
            eip1193_proxy_url: None,
            provider_timeout_ms: 15_000,
            confirmation_timeout_ms: 120_000,
            confirmation_poll_interval_ms: 1_000,
        }
    }
}

impl AdapterConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let runtime_profile = match env::var("NEXWALLET_RUNTIME_PROFILE").ok().as_deref() {
            Some("production") => RuntimeProfile::Production,
            _ => RuntimeProfile::Development,
        };
        Self {
            runtime_profile,
            eip1193_proxy_url: env::var("NEXWALLET_EIP1193_PROXY_URL").ok(),
            provider_timeout_ms: env_ms("NEXWALLET_PROVIDER_TIMEOUT_MS", defaults.provider_timeout_ms),
            confirmation_timeout_ms: env_ms(
                "NEXWALLET_CONFIRMATION_TIMEOUT_MS",
                defaults.confirmation_timeout_ms,
            ),
            confirmation_poll_interval_ms: env_ms(
                "NEXWALLET_CONFIRMATION_POLL_INTERVAL_MS",
                defaults.confirmation_poll_interval_ms,
            ),
        }
    }

    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }
}

fn env_ms(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
