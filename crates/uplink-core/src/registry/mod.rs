//! Plugin-based component registry
//!
//! The registry allows probes and rebooters to be registered dynamically at
//! runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use uplink_core::registry::ComponentRegistry;
//! use uplink_core::config::RebooterConfig;
//!
//! let registry = ComponentRegistry::new();
//! registry.register_rebooter("deco", Box::new(deco_factory));
//!
//! let config = RebooterConfig::Deco { .. };
//! let rebooter = registry.create_rebooter(&config, &password)?;
//! ```
//!
//! ## Registration
//!
//! Implementation crates should register themselves during initialization:
//!
//! ```rust,ignore
//! // In uplink-reboot-deco
//! pub fn register(registry: &ComponentRegistry) {
//!     registry.register_rebooter("deco", Box::new(DecoFactory));
//! }
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use crate::config::{ProbeConfig, RebooterConfig};
use crate::credentials::Password;
use crate::error::{Error, Result};
use crate::traits::{Probe, ProbeFactory, Rebooter, RebooterFactory};

/// Registry for plugin-based probe and rebooter creation
///
/// The registry maintains maps of component type names to factory objects,
/// allowing dynamic instantiation based on configuration.
///
/// ## Thread Safety
///
/// Uses interior mutability with RwLock, allowing concurrent reads and
/// exclusive writes.
#[derive(Default)]
pub struct ComponentRegistry {
    /// Registered probe factories
    probes: RwLock<HashMap<String, Box<dyn ProbeFactory>>>,

    /// Registered rebooter factories
    rebooters: RwLock<HashMap<String, Box<dyn RebooterFactory>>>,
}

impl ComponentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a probe factory
    ///
    /// # Parameters
    ///
    /// - `name`: Probe type name (e.g., "tcp")
    /// - `factory`: Factory object for creating probe instances
    pub fn register_probe(&self, name: impl Into<String>, factory: Box<dyn ProbeFactory>) {
        let name = name.into();
        let mut probes = self.probes.write().unwrap();
        probes.insert(name, factory);
    }

    /// Register a rebooter factory
    ///
    /// # Parameters
    ///
    /// - `name`: Rebooter type name (e.g., "deco")
    /// - `factory`: Factory object for creating rebooter instances
    pub fn register_rebooter(&self, name: impl Into<String>, factory: Box<dyn RebooterFactory>) {
        let name = name.into();
        let mut rebooters = self.rebooters.write().unwrap();
        rebooters.insert(name, factory);
    }

    /// Create a probe from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn Probe>)`: Created probe instance
    /// - `Err(Error)`: If the probe type is not registered or creation fails
    pub fn create_probe(&self, config: &ProbeConfig) -> Result<Box<dyn Probe>> {
        let probe_type = match config {
            ProbeConfig::Tcp { .. } => "tcp",
            ProbeConfig::Custom { factory, .. } => factory,
        };

        let probes = self.probes.read().unwrap();

        let factory = probes
            .get(probe_type)
            .ok_or_else(|| Error::config(format!("unknown probe type: {}", probe_type)))?;

        factory.create(config)
    }

    /// Create a rebooter from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn Rebooter>)`: Created rebooter instance
    /// - `Err(Error)`: If the rebooter type is not registered or creation fails
    pub fn create_rebooter(
        &self,
        config: &RebooterConfig,
        password: &Password,
    ) -> Result<Box<dyn Rebooter>> {
        let rebooter_type = config.type_name();
        let rebooters = self.rebooters.read().unwrap();

        let factory = rebooters
            .get(rebooter_type)
            .ok_or_else(|| Error::config(format!("unknown rebooter type: {}", rebooter_type)))?;

        factory.create(config, password)
    }

    /// List all registered probe types
    pub fn list_probes(&self) -> Vec<String> {
        let probes = self.probes.read().unwrap();
        probes.keys().cloned().collect()
    }

    /// List all registered rebooter types
    pub fn list_rebooters(&self) -> Vec<String> {
        let rebooters = self.rebooters.read().unwrap();
        rebooters.keys().cloned().collect()
    }

    /// Check if a probe type is registered
    pub fn has_probe(&self, name: &str) -> bool {
        let probes = self.probes.read().unwrap();
        probes.contains_key(name)
    }

    /// Check if a rebooter type is registered
    pub fn has_rebooter(&self, name: &str) -> bool {
        let rebooters = self.rebooters.read().unwrap();
        rebooters.contains_key(name)
    }
}
