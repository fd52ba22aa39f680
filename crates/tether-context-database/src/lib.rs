//! # Database Connection Context
//!
//! Connection context for relational database targets (Oracle, MySQL,
//! SQL Server, Sybase, DB2).
//!
//! Each vendor carries a fixed driver identifier and connection-string
//! template; the service URL is generated by resolving the template against
//! the descriptor parts. The provider-open call runs under a bounded retry
//! policy in which only transient connectivity faults earn another attempt.

pub mod config;
pub mod context;

pub use config::{DatabaseConfig, DatabaseVendor};
pub use context::{DatabaseContext, ACCOUNT, PASSWORD};
