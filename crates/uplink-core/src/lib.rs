// # uplink-core
//
// Core library for the uplink connectivity watchdog.
//
// ## Architecture Overview
//
// This library provides the core functionality for the watchdog:
// - **Probe**: Trait for checking remote reachability
// - **Rebooter**: Trait for driving a router reboot via its admin interface
// - **Monitor**: The polling/recovery state machine that ties the two together
// - **ComponentRegistry**: Plugin-based registry for probes and rebooters
//
// ## Design Principles
//
// 1. **Separation of Concerns**: The monitor owns scheduling, retry, and
//    failure containment; probes and rebooters are thin collaborators
// 2. **Plugin-Based**: Components are registered dynamically, no hard-coded if-else
// 3. **Library-First**: The monitor can be embedded and driven with fakes
// 4. **Containment**: Nothing inside a monitoring cycle terminates the process

pub mod config;
pub mod credentials;
pub mod error;
pub mod monitor;
pub mod registry;
pub mod traits;
pub mod uptime;

// Re-export core types for convenience
pub use config::{MonitorConfig, ProbeConfig, RebooterConfig, WatchdogConfig};
pub use credentials::Password;
pub use error::{Error, Result};
pub use monitor::{Monitor, MonitorEvent, MonitorState};
pub use registry::ComponentRegistry;
pub use traits::{Probe, Rebooter};
pub use uptime::format_uptime;
