//! # docstore MongoDB backend
//!
//! Implements the docstore [`Store`](docstore_core::Store) contract
//! over MongoDB: one remote collection per entity type, filtered
//! upserts keyed by identifier, and equality filters translated
//! directly to the server.
//!
//! Transient driver failures surface as
//! [`StoreError::Unavailable`](docstore_core::StoreError::Unavailable);
//! nothing is retried internally.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod store;

pub use codec::{filter_to_bson, from_bson_document, to_bson_document};
pub use store::MongoStore;
