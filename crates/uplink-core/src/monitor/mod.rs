//! Core monitoring state machine
//!
//! The Monitor is responsible for:
//! - Probing remote reachability on a jittered interval via Probe
//! - Triggering a router reboot via Rebooter on connectivity loss
//! - Polling tightly until reachability returns after a reboot
//! - Containing per-cycle failures so the loop never dies
//!
//! ## State machine
//!
//! ```text
//!              probe ok                          probe ok
//!            ┌─────────┐                       ┌──────────────┐
//!            ▼         │                       ▼              │
//!       ┌─────────┐    │   probe fails    ┌────────────┐      │
//!       │ Polling │────┴─────────────────▶│ Recovering │──────┘
//!       └─────────┘   reboot + grace      └────────────┘
//!            ▲                                  │
//!            │   recovered / cap exhausted      │
//!            └──────────────────────────────────┘
//! ```
//!
//! - `Polling`: normal-interval checks, sleeping a uniformly-random
//!   duration in `[poll_min, poll_max]` between probes
//! - `Recovering`: entered after a reboot is triggered; fixed short-interval
//!   checks until reachability returns, then the uptime baseline resets
//! - A failed reboot skips recovery entirely; normal jittered scheduling
//!   governs the next attempt
//! - A stop signal is observable inside every sleep, so shutdown latency is
//!   bounded by the shortest pending wait

use std::time::Duration;

use rand::Rng;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::traits::{Probe, Rebooter};
use crate::uptime::format_uptime;

/// The two states of the monitoring loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Normal-interval reachability checks
    Polling,
    /// Post-reboot tight polling until reachability returns
    Recovering,
}

/// Events emitted by the Monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Monitor loop started
    Started,

    /// Reachability probe failed in the Polling state
    ConnectionLost {
        /// Elapsed uptime at the moment of loss, in whole seconds
        uptime_secs: u64,
    },

    /// Reboot sequence initiated successfully
    RebootTriggered,

    /// Reboot sequence failed; normal polling resumes
    RebootFailed { error: String },

    /// Reachability returned after a reboot; uptime baseline reset
    Recovered {
        /// Elapsed outage time, in whole seconds
        downtime_secs: u64,
    },

    /// Recovery attempt ceiling reached without reachability returning
    RecoveryAborted { attempts: u32 },

    /// Unexpected error inside a cycle, contained
    CycleError { error: String },

    /// Monitor loop terminated
    Stopped { reason: String },
}

/// Outcome of one Polling-state cycle
enum CycleOutcome {
    /// Probe succeeded, stay in Polling
    Reachable,
    /// Probe failed and the reboot was initiated, enter Recovering
    RebootTriggered { lost_at: Instant },
    /// Probe failed but the reboot did not, stay in Polling
    RebootFailed,
}

/// Core monitoring loop
///
/// Owns the polling schedule, the uptime baseline, and the transition
/// into/out of the recovery phase after triggering a reboot. Probes and
/// rebooters are thin collaborators behind traits so the loop can be
/// exercised with fakes.
///
/// ## Lifecycle
///
/// 1. Create with [`Monitor::new()`]
/// 2. Start with [`Monitor::run()`], passing the shutdown watch receiver
/// 3. The loop runs until the stop flag is raised
///
/// ## Concurrency
///
/// Single sequential loop. The reboot future is awaited inline, so at most
/// one reboot action is ever in flight and its outcome is observed before
/// any state transition.
pub struct Monitor {
    /// Reachability probe
    probe: Box<dyn Probe>,

    /// Reboot action
    rebooter: Box<dyn Rebooter>,

    /// Loop settings, immutable after construction
    config: MonitorConfig,

    /// Event sender for external observation
    event_tx: mpsc::Sender<MonitorEvent>,
}

impl Monitor {
    /// Create a new monitor
    ///
    /// # Returns
    ///
    /// A tuple of (monitor, event_receiver) where event_receiver yields
    /// monitor events for logging or test assertions.
    pub fn new(
        probe: Box<dyn Probe>,
        rebooter: Box<dyn Rebooter>,
        config: MonitorConfig,
    ) -> Result<(Self, mpsc::Receiver<MonitorEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let monitor = Self {
            probe,
            rebooter,
            config,
            event_tx: tx,
        };

        Ok((monitor, rx))
    }

    /// Run the monitoring loop until the stop flag is raised
    ///
    /// The `shutdown` receiver is checked at the top of every iteration and
    /// inside every sleep; raising the flag (or dropping the sender) makes
    /// the loop exit after the current suspension point.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(target = self.probe.target(), "monitor loop started");
        self.emit_event(MonitorEvent::Started);

        let mut state = MonitorState::Polling;
        // Monotonic baseline; reset only when reachability is confirmed
        // after a reboot.
        let mut last_up = Instant::now();
        let mut lost_at = last_up;
        let mut recovery_attempts: u32 = 0;

        while !stop_requested(&shutdown) {
            match state {
                MonitorState::Polling => {
                    match self.polling_cycle(last_up).await {
                        Ok(CycleOutcome::Reachable) | Ok(CycleOutcome::RebootFailed) => {}
                        Ok(CycleOutcome::RebootTriggered { lost_at: at }) => {
                            lost_at = at;
                            recovery_attempts = 0;
                            state = MonitorState::Recovering;

                            // Let the router actually go down before probing
                            // for it to come back.
                            let grace = Duration::from_secs(self.config.reboot_grace_secs);
                            if sleep_interruptible(grace, &mut shutdown).await {
                                break;
                            }
                            continue;
                        }
                        Err(e) => {
                            error!(error = %e, "error during monitoring cycle");
                            self.emit_event(MonitorEvent::CycleError {
                                error: e.to_string(),
                            });
                        }
                    }

                    let wait = self.config.jittered_poll_interval();
                    debug!(wait_secs = wait.as_secs(), "sleeping before next check");
                    if sleep_interruptible(wait, &mut shutdown).await {
                        break;
                    }
                }

                MonitorState::Recovering => {
                    if self.probe.is_reachable().await {
                        last_up = Instant::now();
                        let downtime = last_up.duration_since(lost_at);
                        info!(
                            downtime = %format_uptime(downtime),
                            "router back online; uptime counter reset"
                        );
                        self.emit_event(MonitorEvent::Recovered {
                            downtime_secs: downtime.as_secs(),
                        });
                        state = MonitorState::Polling;

                        let wait = self.config.jittered_poll_interval();
                        if sleep_interruptible(wait, &mut shutdown).await {
                            break;
                        }
                        continue;
                    }

                    recovery_attempts += 1;
                    if let Some(max) = self.config.max_recovery_attempts
                        && recovery_attempts >= max
                    {
                        warn!(
                            attempts = recovery_attempts,
                            "recovery window exhausted; resuming normal polling"
                        );
                        self.emit_event(MonitorEvent::RecoveryAborted {
                            attempts: recovery_attempts,
                        });
                        state = MonitorState::Polling;

                        let wait = self.config.jittered_poll_interval();
                        if sleep_interruptible(wait, &mut shutdown).await {
                            break;
                        }
                        continue;
                    }

                    let wait = Duration::from_secs(self.config.recovery_poll_secs);
                    if sleep_interruptible(wait, &mut shutdown).await {
                        break;
                    }
                }
            }
        }

        self.emit_event(MonitorEvent::Stopped {
            reason: "stop signal".to_string(),
        });
        info!("monitor loop terminated");

        Ok(())
    }

    /// Run one Polling-state cycle: probe, and on failure drive the reboot
    ///
    /// A reboot failure is contained here: it is logged, reported as an
    /// event, and normal jittered scheduling governs the next attempt. It
    /// never enters the recovery phase and never aborts the loop.
    async fn polling_cycle(&self, last_up: Instant) -> Result<CycleOutcome> {
        if self.probe.is_reachable().await {
            return Ok(CycleOutcome::Reachable);
        }

        let lost_at = Instant::now();
        let uptime = lost_at.duration_since(last_up);
        warn!(
            target = self.probe.target(),
            uptime = %format_uptime(uptime),
            "connection lost; rebooting router"
        );
        self.emit_event(MonitorEvent::ConnectionLost {
            uptime_secs: uptime.as_secs(),
        });

        match self.rebooter.reboot().await {
            Ok(()) => {
                info!(rebooter = self.rebooter.name(), "reboot initiated");
                self.emit_event(MonitorEvent::RebootTriggered);
                Ok(CycleOutcome::RebootTriggered { lost_at })
            }
            Err(e) => {
                warn!(
                    rebooter = self.rebooter.name(),
                    error = %e,
                    "reboot failed; will retry on the next scheduled cycle"
                );
                self.emit_event(MonitorEvent::RebootFailed {
                    error: e.to_string(),
                });
                Ok(CycleOutcome::RebootFailed)
            }
        }
    }

    /// Emit a monitor event
    fn emit_event(&self, event: MonitorEvent) {
        // Send event, logging a warning if the channel is full. Dropping is
        // preferable to blocking the loop on a slow consumer.
        if self.event_tx.try_send(event).is_err() {
            warn!("event channel full, dropping event");
        }
    }
}

impl MonitorConfig {
    /// Draw the next normal-state poll interval
    ///
    /// Uniformly random in `[poll_min_secs, poll_max_secs]`, inclusive on
    /// both ends.
    pub fn jittered_poll_interval(&self) -> Duration {
        let secs = rand::rng().random_range(self.poll_min_secs..=self.poll_max_secs);
        Duration::from_secs(secs)
    }
}

/// Whether the stop flag is currently raised
fn stop_requested(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}

/// Sleep for `duration`, waking early if the stop flag is raised
///
/// Returns `true` if the sleep was interrupted by shutdown (including the
/// sender being dropped).
async fn sleep_interruptible(duration: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        // wait_for returns Err when the sender is dropped; either way the
        // loop should unwind.
        _ = shutdown.wait_for(|stop| *stop) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jittered_interval_stays_in_bounds() {
        let config = MonitorConfig {
            poll_min_secs: 10,
            poll_max_secs: 60,
            ..MonitorConfig::default()
        };

        for _ in 0..1_000 {
            let wait = config.jittered_poll_interval();
            assert!(wait >= Duration::from_secs(10), "drew {:?}", wait);
            assert!(wait <= Duration::from_secs(60), "drew {:?}", wait);
        }
    }

    #[test]
    fn jittered_interval_with_equal_bounds_is_fixed() {
        let config = MonitorConfig {
            poll_min_secs: 30,
            poll_max_secs: 30,
            ..MonitorConfig::default()
        };

        for _ in 0..10 {
            assert_eq!(config.jittered_poll_interval(), Duration::from_secs(30));
        }
    }

    #[tokio::test]
    async fn interruptible_sleep_completes_without_signal() {
        let (_tx, mut rx) = watch::channel(false);

        let stopped = sleep_interruptible(Duration::from_millis(10), &mut rx).await;
        assert!(!stopped);
    }

    #[tokio::test]
    async fn interruptible_sleep_wakes_on_stop() {
        let (tx, mut rx) = watch::channel(false);

        let start = std::time::Instant::now();
        let sleeper = tokio::spawn(async move {
            sleep_interruptible(Duration::from_secs(60), &mut rx).await
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();

        let stopped = sleeper.await.unwrap();
        assert!(stopped);
        assert!(
            start.elapsed() < Duration::from_secs(1),
            "sleep should wake well before the full duration"
        );
    }

    #[tokio::test]
    async fn interruptible_sleep_wakes_on_sender_drop() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);

        let stopped = sleep_interruptible(Duration::from_secs(60), &mut rx).await;
        assert!(stopped);
    }
}
