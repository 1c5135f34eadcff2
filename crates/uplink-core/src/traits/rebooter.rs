// # Rebooter Trait
//
// Defines the interface for driving a router reboot through its web
// administration interface.
//
// ## Implementations
//
// - TP-Link Deco admin UI: `uplink-reboot-deco` crate
// - Future: other vendor admin UIs, SNMP, smart-plug power cycling
//
// The login/confirm sequence behind this trait is inherently coupled to one
// vendor's admin surface. Implementations are swappable actions satisfying
// only this contract, so the monitor core can be tested with a fake.

use async_trait::async_trait;

use crate::credentials::Password;

/// Trait for rebooter implementations
///
/// Rebooters are **single-shot actions** with strict limitations:
///
/// - One reboot sequence per invocation, then return success or failure
/// - No retry or backoff logic (owned by the `Monitor`'s scheduling)
/// - No scheduling decisions (owned by the `Monitor`)
/// - No background tasks (the monitor awaits the reboot inline, so at most
///   one reboot is ever in flight)
///
/// The implementation owns its own internal timeout for how long to wait on
/// the admin UI; the conventional ceiling is the configured maximum poll
/// interval.
#[async_trait]
pub trait Rebooter: Send + Sync {
    /// Perform the login + reboot + confirmation sequence
    ///
    /// # Returns
    ///
    /// - `Ok(())`: the reboot was initiated
    /// - `Err(Error)`: any step failed; the monitor logs it and lets normal
    ///   scheduling govern the next attempt
    async fn reboot(&self) -> crate::Result<()>;

    /// The rebooter name (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// Helper trait for constructing rebooters from configuration
pub trait RebooterFactory: Send + Sync {
    /// Create a Rebooter instance from configuration and credentials
    fn create(
        &self,
        config: &crate::config::RebooterConfig,
        password: &Password,
    ) -> crate::Result<Box<dyn Rebooter>>;
}
