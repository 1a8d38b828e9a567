//! # docstore server
//!
//! HTTP resource adapter over the docstore contract: one resource per
//! registered entity type, entities crossing the wire as
//! field-name/value JSON with the identifier under `_id`.
//!
//! The storage contract itself carries no transport concern; this
//! crate is an adapter that only calls
//! [`Store`](docstore_core::Store) operations through an erased type
//! registry.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handler;
pub mod registry;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use registry::{Registry, Resource};
pub use router::build_router;
pub use server::ApiServer;
