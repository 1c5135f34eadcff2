//! Test doubles and common utilities for monitor contract tests
//!
//! These fakes let the contract tests drive the monitor through exact
//! probe/reboot scenarios without touching the network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use uplink_core::config::MonitorConfig;
use uplink_core::error::{Error, Result};
use uplink_core::traits::{Probe, Rebooter};

/// A probe that replays a scripted sequence of results
///
/// Once the script is exhausted it keeps returning `default`.
pub struct ScriptedProbe {
    script: Mutex<VecDeque<bool>>,
    default: bool,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedProbe {
    pub fn new(script: impl IntoIterator<Item = bool>, default: bool) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            default,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A probe that always answers the same
    pub fn always(result: bool) -> Self {
        Self::new([], result)
    }

    /// Shared handle to the probe call counter
    pub fn call_count_handle(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait::async_trait]
impl Probe for ScriptedProbe {
    async fn is_reachable(&self) -> bool {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.default)
    }

    fn target(&self) -> &str {
        "scripted.test"
    }
}

/// A rebooter that always succeeds and tracks calls
pub struct MockRebooter {
    call_count: Arc<AtomicUsize>,
}

impl MockRebooter {
    pub fn new() -> Self {
        Self {
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared handle to the reboot call counter
    pub fn call_count_handle(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait::async_trait]
impl Rebooter for MockRebooter {
    async fn reboot(&self) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// A rebooter that always fails and tracks calls
pub struct FailingRebooter {
    call_count: Arc<AtomicUsize>,
}

impl FailingRebooter {
    pub fn new() -> Self {
        Self {
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared handle to the reboot call counter
    pub fn call_count_handle(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait::async_trait]
impl Rebooter for FailingRebooter {
    async fn reboot(&self) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Err(Error::reboot("login element not found"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Helper to create a minimal MonitorConfig for testing
///
/// Fixed (non-jittered) 10s poll interval, 5s recovery interval, 10s grace.
/// Timer-driven tests run these under a paused tokio clock.
pub fn minimal_config() -> MonitorConfig {
    MonitorConfig {
        poll_min_secs: 10,
        poll_max_secs: 10,
        recovery_poll_secs: 5,
        reboot_grace_secs: 10,
        max_recovery_attempts: None,
        event_channel_capacity: 64,
    }
}
