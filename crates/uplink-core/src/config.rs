//! Configuration types for the watchdog
//!
//! This module defines all configuration structures used throughout the
//! crate. Configuration is loaded once at startup and never mutated; the
//! monitor borrows it for the lifetime of the loop.

use serde::{Deserialize, Serialize};

/// Main watchdog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchdogConfig {
    /// Reachability probe configuration
    pub probe: ProbeConfig,

    /// Rebooter configuration
    pub rebooter: RebooterConfig,

    /// Monitor loop settings
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl WatchdogConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.probe.validate()?;
        self.rebooter.validate()?;
        self.monitor.validate()?;
        Ok(())
    }
}

/// Reachability probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProbeConfig {
    /// TCP-connect probe against a well-known remote host
    Tcp {
        /// Hostname to test connectivity against
        host: String,
        /// TCP port to connect to
        #[serde(default = "default_probe_port")]
        port: u16,
        /// Connect timeout in seconds
        #[serde(default = "default_probe_timeout_secs")]
        timeout_secs: u64,
    },

    /// Custom probe
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProbeConfig {
    /// Validate the probe configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProbeConfig::Tcp { host, timeout_secs, .. } => {
                if host.is_empty() {
                    return Err(crate::Error::config("probe host cannot be empty"));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("probe timeout must be > 0"));
                }
                Ok(())
            }
            ProbeConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("custom probe factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("custom probe config cannot be null"));
                }
                Ok(())
            }
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig::Tcp {
            host: "one.one.one.one".to_string(),
            port: default_probe_port(),
            timeout_secs: default_probe_timeout_secs(),
        }
    }
}

/// Rebooter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RebooterConfig {
    /// TP-Link Deco-style web admin interface
    Deco {
        /// Base URL of the router's admin interface
        url: String,
        /// If true, authenticate but skip the actual reboot request
        #[serde(default)]
        dry_run: bool,
        /// Ceiling on each admin request, in seconds
        ///
        /// Conventionally set to the maximum poll interval; `None` uses the
        /// implementation default.
        #[serde(default)]
        timeout_secs: Option<u64>,
    },

    /// Custom rebooter
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl RebooterConfig {
    /// Validate the rebooter configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            RebooterConfig::Deco { url, .. } => {
                if url.is_empty() {
                    return Err(crate::Error::config("rebooter URL cannot be empty"));
                }
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(crate::Error::config(format!(
                        "rebooter URL must use HTTP or HTTPS scheme, got: {}",
                        url
                    )));
                }
                Ok(())
            }
            RebooterConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "custom rebooter factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config("custom rebooter config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the rebooter type name
    pub fn type_name(&self) -> &str {
        match self {
            RebooterConfig::Deco { .. } => "deco",
            RebooterConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Monitor loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Minimum seconds between normal-state reachability checks
    #[serde(default = "default_poll_min_secs")]
    pub poll_min_secs: u64,

    /// Maximum seconds between normal-state reachability checks
    ///
    /// The actual interval is drawn uniformly from
    /// `[poll_min_secs, poll_max_secs]` so probe timing is not lockstep
    /// with the remote endpoint's own maintenance windows.
    #[serde(default = "default_poll_max_secs")]
    pub poll_max_secs: u64,

    /// Fixed interval between probes while waiting for the router to come
    /// back after a reboot
    #[serde(default = "default_recovery_poll_secs")]
    pub recovery_poll_secs: u64,

    /// Seconds to wait after triggering a reboot before the first recovery
    /// probe, giving the router time to actually go down
    #[serde(default = "default_reboot_grace_secs")]
    pub reboot_grace_secs: u64,

    /// Optional ceiling on recovery probes after a reboot
    ///
    /// The reference behavior polls forever until reachability returns;
    /// `None` preserves that. With `Some(n)`, recovery is abandoned after
    /// `n` failed probes and normal polling resumes (the next failed probe
    /// will trigger another reboot).
    #[serde(default)]
    pub max_recovery_attempts: Option<u32>,

    /// Capacity of the internal event channel
    ///
    /// When full, new monitor events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl MonitorConfig {
    /// Validate the monitor configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.poll_min_secs == 0 {
            return Err(crate::Error::config("poll_min_secs must be >= 1"));
        }
        if self.poll_min_secs > self.poll_max_secs {
            return Err(crate::Error::config(format!(
                "poll_min_secs ({}) must be <= poll_max_secs ({})",
                self.poll_min_secs, self.poll_max_secs
            )));
        }
        if self.recovery_poll_secs == 0 {
            return Err(crate::Error::config("recovery_poll_secs must be >= 1"));
        }
        if self.max_recovery_attempts == Some(0) {
            return Err(crate::Error::config(
                "max_recovery_attempts must be >= 1 when set",
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("event_channel_capacity must be >= 1"));
        }
        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_min_secs: default_poll_min_secs(),
            poll_max_secs: default_poll_max_secs(),
            recovery_poll_secs: default_recovery_poll_secs(),
            reboot_grace_secs: default_reboot_grace_secs(),
            max_recovery_attempts: None,
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_probe_port() -> u16 {
    80
}

fn default_probe_timeout_secs() -> u64 {
    2
}

fn default_poll_min_secs() -> u64 {
    10
}

fn default_poll_max_secs() -> u64 {
    60
}

fn default_recovery_poll_secs() -> u64 {
    5
}

fn default_reboot_grace_secs() -> u64 {
    10
}

fn default_event_channel_capacity() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> WatchdogConfig {
        WatchdogConfig {
            probe: ProbeConfig::default(),
            rebooter: RebooterConfig::Deco {
                url: "http://192.168.1.1/webpages/index.html#reboot".to_string(),
                dry_run: false,
                timeout_secs: None,
            },
            monitor: MonitorConfig::default(),
        }
    }

    #[test]
    fn default_config_validates() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_poll_interval() {
        let mut config = valid_config();
        config.monitor.poll_min_secs = 120;
        config.monitor.poll_max_secs = 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_poll_min() {
        let mut config = valid_config();
        config.monitor.poll_min_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_probe_host() {
        let mut config = valid_config();
        config.probe = ProbeConfig::Tcp {
            host: String::new(),
            port: 80,
            timeout_secs: 2,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_http_rebooter_url() {
        let mut config = valid_config();
        config.rebooter = RebooterConfig::Deco {
            url: "ftp://192.168.1.1".to_string(),
            dry_run: false,
            timeout_secs: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_recovery_cap() {
        let mut config = valid_config();
        config.monitor.max_recovery_attempts = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn equal_poll_bounds_are_valid() {
        let mut config = valid_config();
        config.monitor.poll_min_secs = 30;
        config.monitor.poll_max_secs = 30;
        assert!(config.validate().is_ok());
    }
}
