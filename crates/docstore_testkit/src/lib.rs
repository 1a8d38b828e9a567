//! # docstore testkit
//!
//! Shared test material for docstore backends:
//! - Sample entity types ([`fixtures`])
//! - The backend-parity contract suite ([`suite`]) — every backend
//!   runs the same checks and must behave identically
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docstore_core::MemoryStore;
//! use docstore_testkit::suite;
//!
//! #[tokio::test]
//! async fn contract() {
//!     suite::check_store_contract(&MemoryStore::new()).await;
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod suite;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::suite::*;
}
