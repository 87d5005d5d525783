//! Shared substrate for the forum and blog services.
//!
//! Everything the two applications get from the managed platform lives
//! here: the identity service client, the datastore client, the blob
//! store, plus the plumbing both services share (config loading, error
//! responses, pagination arithmetic, HTTP serving).

pub mod blobs;
pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod pager;
pub mod store;
