//! hobbylog/crates/storage-adapters/src/lib.rs
//!
//! Gateway implementations: the Postgres table stores, the dashmap-backed
//! in-memory double, and the object-storage backends (local filesystem,
//! S3). Which ones get compiled in is the binary's feature choice.

pub mod memory;
mod sniff;

#[cfg(feature = "db-postgres")]
pub mod postgres;

#[cfg(feature = "media-local")]
pub mod media_local;

#[cfg(feature = "media-s3")]
pub mod media_s3;

pub use memory::{MemoryGateway, MemoryMediaStorage};

#[cfg(feature = "db-postgres")]
pub use postgres::PostgresGateway;

#[cfg(feature = "media-local")]
pub use media_local::LocalMediaStorage;

#[cfg(feature = "media-s3")]
pub use media_s3::S3MediaStorage;
