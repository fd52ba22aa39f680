//! # Metadata-Store Connection Context
//!
//! Context for a metadata store whose persistence lives in a database. The
//! store composes a database configuration and delegates credentials and the
//! connection URL to it; on top it carries the registered instance name, the
//! partition and the served namespaces.

pub mod config;
pub mod context;

pub use config::MetadataConfig;
pub use context::{MetadataContext, INSTANCE, NAMESPACES, PARTITION};
