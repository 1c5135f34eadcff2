//! Contract test: shutdown determinism
//!
//! The stop flag must be observable from within any sleep: shutdown latency
//! is bounded by the shortest pending wait, never by the longest configured
//! interval. These tests run on the real clock on purpose.

mod common;

use std::time::{Duration, Instant};

use common::*;
use tokio::sync::watch;
use uplink_core::config::MonitorConfig;
use uplink_core::Monitor;

fn long_interval_config() -> MonitorConfig {
    MonitorConfig {
        poll_min_secs: 60,
        poll_max_secs: 120,
        ..minimal_config()
    }
}

#[tokio::test]
async fn stop_during_long_sleep_exits_quickly() {
    let probe = ScriptedProbe::always(true);
    let rebooter = MockRebooter::new();

    let (monitor, _events) =
        Monitor::new(Box::new(probe), Box::new(rebooter), long_interval_config())
            .expect("monitor construction succeeds");

    let (stop_tx, stop_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { monitor.run(stop_rx).await });

    // The monitor is now inside a 60-120s jittered sleep.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let stop_sent = Instant::now();
    stop_tx.send(true).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
    assert!(
        result.is_ok(),
        "monitor must exit within 1s of the stop signal, not wait out the sleep"
    );
    assert!(stop_sent.elapsed() < Duration::from_secs(1));

    result.unwrap().unwrap().unwrap();
}

#[tokio::test]
async fn stop_during_recovery_sleep_exits_quickly() {
    // Drive the monitor into the recovery phase, then stop it while it is
    // waiting between recovery probes.
    let probe = ScriptedProbe::new([false], false);
    let rebooter = MockRebooter::new();

    let config = MonitorConfig {
        poll_min_secs: 60,
        poll_max_secs: 60,
        recovery_poll_secs: 60,
        reboot_grace_secs: 60,
        ..minimal_config()
    };

    let (monitor, _events) = Monitor::new(Box::new(probe), Box::new(rebooter), config)
        .expect("monitor construction succeeds");

    let (stop_tx, stop_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { monitor.run(stop_rx).await });

    // Probe fails immediately, reboot succeeds, the monitor enters the 60s
    // grace sleep.
    tokio::time::sleep(Duration::from_millis(100)).await;
    stop_tx.send(true).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
    assert!(
        result.is_ok(),
        "monitor must exit within 1s even from the recovery phase"
    );
    result.unwrap().unwrap().unwrap();
}

#[tokio::test]
async fn stop_raised_before_run_exits_immediately() {
    let probe = ScriptedProbe::always(true);
    let probe_calls = probe.call_count_handle();
    let rebooter = MockRebooter::new();

    let (monitor, _events) =
        Monitor::new(Box::new(probe), Box::new(rebooter), long_interval_config())
            .expect("monitor construction succeeds");

    let (stop_tx, stop_rx) = watch::channel(true);

    let result = tokio::time::timeout(Duration::from_secs(1), monitor.run(stop_rx)).await;
    assert!(result.is_ok(), "pre-raised stop flag must short-circuit the loop");
    result.unwrap().unwrap();

    assert_eq!(
        probe_calls.load(std::sync::atomic::Ordering::SeqCst),
        0,
        "no probe should run once stop is requested"
    );

    drop(stop_tx);
}

#[tokio::test]
async fn dropped_sender_terminates_loop() {
    let probe = ScriptedProbe::always(true);
    let rebooter = MockRebooter::new();

    let (monitor, _events) =
        Monitor::new(Box::new(probe), Box::new(rebooter), long_interval_config())
            .expect("monitor construction succeeds");

    let (stop_tx, stop_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { monitor.run(stop_rx).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    drop(stop_tx);

    let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
    assert!(
        result.is_ok(),
        "a dropped shutdown sender must unwind the loop"
    );
    result.unwrap().unwrap().unwrap();
}
