//! Core traits for the watchdog
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Probe`]: Check remote reachability
//! - [`Rebooter`]: Drive a router reboot via its admin interface

pub mod probe;
pub mod rebooter;

pub use probe::{Probe, ProbeFactory};
pub use rebooter::{Rebooter, RebooterFactory};
