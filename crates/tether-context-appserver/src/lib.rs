//! # Application-Server Connection Contexts
//!
//! RMI/JNDI naming contexts and JMX/MBean-server contexts.
//!
//! Platform differences (protocols, initial-context factories, whether the
//! naming layer honors timeouts) are data on [`ServerPlatform`]; vendor
//! presets are factory functions on the configs, not subclasses.

pub mod config;
pub mod jmx;
pub mod rmi;

pub use config::{JmxConfig, RmiConfig, ServerPlatform};
pub use jmx::JmxContext;
pub use rmi::RmiContext;
