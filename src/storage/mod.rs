//! Storage dependency subsystem.
//!
//! The runtime treats its storage backend as a black box: a connector that
//! either yields a live connection within a bounded time or fails. The
//! lifecycle manager owns the resulting handle exclusively and releases it
//! as the last step of shutdown.

pub mod connector;

pub use connector::{StorageConnection, StorageConnector, StorageError, TcpConnector};
