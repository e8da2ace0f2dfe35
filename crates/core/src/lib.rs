pub mod analytics;
pub mod chart;
pub mod client;
pub mod dashboard;
pub mod domain;

pub mod config {
    use anyhow::Context;

    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_RETRIES: u32 = 1;
    const DEFAULT_PAGE_SIZE: u32 = 10;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub analytics_api_base_url: Option<String>,
        pub analytics_api_timeout_secs: u64,
        pub analytics_api_retries: u32,
        pub dashboard_page_size: u32,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                analytics_api_base_url: std::env::var("ANALYTICS_API_BASE_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                analytics_api_timeout_secs: parse_env("ANALYTICS_API_TIMEOUT_SECS")?
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
                analytics_api_retries: parse_env("ANALYTICS_API_RETRIES")?
                    .unwrap_or(DEFAULT_RETRIES)
                    .max(1),
                dashboard_page_size: parse_env("DASHBOARD_PAGE_SIZE")?
                    .unwrap_or(DEFAULT_PAGE_SIZE)
                    .clamp(1, 100),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_analytics_api_base_url(&self) -> anyhow::Result<&str> {
            self.analytics_api_base_url
                .as_deref()
                .context("ANALYTICS_API_BASE_URL is required")
        }
    }

    fn parse_env<T>(key: &str) -> anyhow::Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match std::env::var(key) {
            Ok(s) if !s.trim().is_empty() => s
                .trim()
                .parse::<T>()
                .map(Some)
                .with_context(|| format!("{key} is not a valid number: {s}")),
            _ => Ok(None),
        }
    }
}
