//! Convenient imports for occkv.
//!
//! ```
//! use occkv::prelude::*;
//!
//! let cluster = Cluster::seeded(3);
//! assert_eq!(cluster.store().len(), 3);
//! ```

// Entry points
pub use crate::cluster::{Cluster, ClusterBuilder};

// Errors
pub use occkv_core::{Error, Result};

// Service traits, needed to call coordinator/store/validator methods
pub use occkv_core::{CoordinatorApi, StoreApi, ValidatorApi};

// Data model
pub use occkv_core::{Entry, Outcome, TxnStats, Version};
