// # Probe Trait
//
// Defines the interface for reachability checks.
//
// ## Implementations
//
// - TCP-connect (default): `uplink-probe-tcp` crate
// - Future: ICMP, HTTP HEAD, DNS-query probes
//
// ## Usage
//
// ```rust,ignore
// use uplink_core::Probe;
//
// #[tokio::main]
// async fn main() {
//     let probe = /* Probe implementation */;
//
//     if probe.is_reachable().await {
//         println!("{} is up", probe.target());
//     }
// }
// ```

use async_trait::async_trait;

/// Trait for reachability probe implementations
///
/// A probe is a liveness approximation, not a full health check: false
/// negatives under transient network blips are expected and accepted.
///
/// Probes are **observers**, not decision-makers:
///
/// - They answer "is the remote reachable right now", nothing more
/// - They must complete within their own short timeout
/// - They must not retry, sleep, or schedule (owned by the `Monitor`)
/// - They must not trigger reboots (owned by the `Rebooter`)
///
/// Any resolution or connection error, including timeout, is reported as
/// unreachable rather than surfaced as an error; a probe failure drives the
/// state machine, it never aborts the loop.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Check whether the remote target is currently reachable
    ///
    /// Must return within the probe's configured timeout. All failure modes
    /// (DNS, connect, timeout) yield `false`.
    async fn is_reachable(&self) -> bool;

    /// The probed target, for logging
    fn target(&self) -> &str;
}

impl std::fmt::Debug for dyn Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Probe").field("target", &self.target()).finish()
    }
}

/// Helper trait for constructing probes from configuration
pub trait ProbeFactory: Send + Sync {
    /// Create a Probe instance from configuration
    fn create(&self, config: &crate::config::ProbeConfig) -> crate::Result<Box<dyn Probe>>;
}
