//! # Workflow Connection Context
//!
//! Context for workflow/SOA composite servers. The primary client is opened
//! per the connection environment; a secondary deployer client derives from
//! the same configuration and is built only when first requested. A client
//! whose platform is gone right after open resets the context instead of
//! lingering half-connected.

pub mod config;
pub mod context;

pub use config::WorkflowConfig;
pub use context::{WorkflowContext, WorkflowHandle};
