//! Kitchen configuration

use std::time::Duration;

/// Kitchen feed configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | KITCHEN_POLL_INTERVAL_SECS | 15 | Order list refresh period |
/// | KITCHEN_ALERT_SECS | 10 | How long a new-order alert stays up |
/// | LOG_LEVEL | info | Log level |
/// | LOG_DIR | (none) | Directory for daily log files |
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    pub poll_interval: Duration,
    pub alert_duration: Duration,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl KitchenConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            poll_interval: secs_var("KITCHEN_POLL_INTERVAL_SECS").unwrap_or(defaults.poll_interval),
            alert_duration: secs_var("KITCHEN_ALERT_SECS").unwrap_or(defaults.alert_duration),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_alert_duration(mut self, duration: Duration) -> Self {
        self.alert_duration = duration;
        self
    }
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(15),
            alert_duration: Duration::from_secs(10),
            log_level: "info".into(),
            log_dir: None,
        }
    }
}

/// Positive whole seconds from an env var
fn secs_var(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|s| *s > 0)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_builders() {
        let config = KitchenConfig::default().with_poll_interval(Duration::from_secs(5));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.alert_duration, Duration::from_secs(10));
        assert_eq!(config.log_level, "info");
    }
}
