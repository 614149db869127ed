//! Service configuration.

/// Main marketplace configuration.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Listen address for the (external) HTTP surface.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Per-user notification channel capacity.
    pub notify_channel_capacity: usize,
    /// Log level.
    pub log_level: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 8080,
            notify_channel_capacity: 64,
            log_level: "info".to_string(),
        }
    }
}

impl MarketConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("GIGDESK_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(port) = std::env::var("GIGDESK_LISTEN_PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }

        if let Ok(capacity) = std::env::var("GIGDESK_NOTIFY_CAPACITY") {
            if let Ok(capacity) = capacity.parse() {
                config.notify_channel_capacity = capacity;
            }
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self.notify_channel_capacity == 0 {
            return Err("Notification channel capacity cannot be 0".to_string());
        }

        Ok(())
    }
}
