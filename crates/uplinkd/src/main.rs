// # uplinkd - Connectivity Watchdog Daemon
//
// Long-running foreground process that probes a remote host for
// reachability and, on sustained loss, reboots the local router via its web
// administration interface.
//
// The daemon is a thin integration layer:
// 1. Parse CLI flags / environment
// 2. Initialize logging (stdout + file)
// 3. Load the router credentials (missing/empty file is fatal)
// 4. Register probe and rebooter implementations
// 5. Run the monitor until SIGINT/SIGTERM
//
// All watchdog logic lives in uplink-core.
//
// ## Example
//
// ```bash
// uplinkd --cred-file /etc/uplink/cred.txt \
//         --router-url http://192.168.1.1/webpages/index.html#reboot \
//         --remote one.one.one.one \
//         --interval-min 10 --interval-max 60
// ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing::{debug, error, info};

use uplink_core::config::{MonitorConfig, ProbeConfig, RebooterConfig, WatchdogConfig};
use uplink_core::credentials::{self, Password};
use uplink_core::{ComponentRegistry, Monitor};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

mod logging;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum WatchdogExitCode {
    /// Clean shutdown (stop signal received, loop exited)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<WatchdogExitCode> for ExitCode {
    fn from(code: WatchdogExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Probe a host; if unreachable, reboot the router via its web admin UI
#[derive(Debug, Parser)]
#[command(name = "uplinkd", version, about)]
struct Cli {
    /// Path to the file containing the router password (first token)
    #[arg(long, default_value = "cred.txt", env = "UPLINK_CRED_FILE")]
    cred_file: PathBuf,

    /// Full URL of the router's admin/reboot page
    #[arg(
        long,
        default_value = "http://192.168.1.1/webpages/index.html#reboot",
        env = "UPLINK_ROUTER_URL"
    )]
    router_url: String,

    /// Hostname to test connectivity against
    #[arg(long, default_value = "one.one.one.one", env = "UPLINK_REMOTE")]
    remote: String,

    /// TCP port probed on the remote host
    #[arg(long, default_value_t = 80)]
    probe_port: u16,

    /// Probe connect timeout in seconds
    #[arg(long, default_value_t = 2)]
    probe_timeout: u64,

    /// Minimum seconds between connectivity checks
    #[arg(long, default_value_t = 10)]
    interval_min: u64,

    /// Maximum seconds between connectivity checks
    #[arg(long, default_value_t = 60)]
    interval_max: u64,

    /// Seconds between probes while waiting for the router to come back
    #[arg(long, default_value_t = 5)]
    recovery_interval: u64,

    /// Seconds to wait after a reboot before the first recovery probe
    #[arg(long, default_value_t = 10)]
    reboot_grace: u64,

    /// Give up recovery after this many failed probes (default: unbounded)
    #[arg(long)]
    max_recovery_attempts: Option<u32>,

    /// Path to the log file (records also go to stdout)
    #[arg(long, default_value = "event.log", env = "UPLINK_LOG_FILE")]
    log_file: PathBuf,

    /// Log level or filter directive
    #[arg(long, default_value = "info", env = "UPLINK_LOG")]
    log_level: String,

    /// Authenticate against the router but skip the actual reboot request
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Assemble the watchdog configuration from the parsed flags
    fn watchdog_config(&self) -> WatchdogConfig {
        WatchdogConfig {
            probe: ProbeConfig::Tcp {
                host: self.remote.clone(),
                port: self.probe_port,
                timeout_secs: self.probe_timeout,
            },
            rebooter: RebooterConfig::Deco {
                url: self.router_url.clone(),
                dry_run: self.dry_run,
                // Admin requests get the max poll interval as their ceiling.
                timeout_secs: Some(self.interval_max),
            },
            monitor: MonitorConfig {
                poll_min_secs: self.interval_min,
                poll_max_secs: self.interval_max,
                recovery_poll_secs: self.recovery_interval,
                reboot_grace_secs: self.reboot_grace,
                max_recovery_attempts: self.max_recovery_attempts,
                ..MonitorConfig::default()
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = cli.watchdog_config();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        return WatchdogExitCode::ConfigError.into();
    }

    if let Err(e) = logging::init(&cli.log_file, &cli.log_level) {
        eprintln!("Failed to initialize logging: {:#}", e);
        return WatchdogExitCode::ConfigError.into();
    }

    info!("starting uplinkd");

    // Missing or empty credential file refuses startup.
    let password = match credentials::load_password(&cli.cred_file) {
        Ok(password) => password,
        Err(e) => {
            error!(error = %e, "failed to load credentials");
            return WatchdogExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to create tokio runtime");
            return WatchdogExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        match run_daemon(config, password).await {
            Ok(()) => WatchdogExitCode::CleanShutdown,
            Err(e) => {
                error!(error = %e, "daemon error");
                WatchdogExitCode::RuntimeError
            }
        }
    });

    code.into()
}

/// Run the daemon
async fn run_daemon(config: WatchdogConfig, password: Password) -> Result<()> {
    // Register built-in implementations.
    let registry = ComponentRegistry::new();
    uplink_probe_tcp::register(&registry);
    uplink_reboot_deco::register(&registry);

    let probe = registry.create_probe(&config.probe)?;
    let rebooter = registry.create_rebooter(&config.rebooter, &password)?;

    let (monitor, mut events) = Monitor::new(probe, rebooter, config.monitor)?;

    // Translate SIGINT/SIGTERM into the shared stop flag.
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(wait_for_shutdown(stop_tx));

    // The monitor logs its own transitions; draining the channel keeps it
    // from filling and leaves a debug-level audit trail.
    let drain = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!(?event, "monitor event");
        }
    });

    let result = monitor.run(stop_rx).await;
    drain.abort();

    result?;
    Ok(())
}

/// Wait for a shutdown signal (SIGTERM or SIGINT) and raise the stop flag
#[cfg(unix)]
async fn wait_for_shutdown(stop_tx: watch::Sender<bool>) {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to set up SIGTERM handler");
            return;
        }
    };
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to set up SIGINT handler");
            return;
        }
    };

    let received = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    info!(signal = received, "shutdown requested; exiting");
    let _ = stop_tx.send(true);
}

/// Wait for CTRL-C and raise the stop flag
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown(stop_tx: watch::Sender<bool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to wait for CTRL-C");
        return;
    }

    info!("shutdown requested; exiting");
    let _ = stop_tx.send(true);
}
