//! Storage connection establishment.
//!
//! # Responsibilities
//! - Open a connection to the storage endpoint within a bounded time
//! - Hand the lifecycle manager an exclusively-owned handle
//! - Release the handle cleanly during shutdown
//!
//! # Design Decisions
//! - Every connect has a deadline; a hanging endpoint surfaces as `Timeout`
//! - Traits at the seam so tests can script connect outcomes per attempt

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Error type for storage connection attempts.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("connect timed out after {0:?}")]
    Timeout(Duration),

    #[error("connect failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A live connection to the storage backend.
///
/// The lifecycle manager is the only owner; nothing else may close it.
#[async_trait]
pub trait StorageConnection: Send + std::fmt::Debug {
    /// Release the connection. Consumes the handle; errors during release
    /// are logged, not propagated, since shutdown must keep moving.
    async fn close(self: Box<Self>);
}

/// Factory for storage connections.
#[async_trait]
pub trait StorageConnector: Send + Sync {
    /// Attempt to connect to `addr`, failing after `timeout`.
    async fn connect(
        &self,
        addr: SocketAddr,
        timeout: Duration,
    ) -> Result<Box<dyn StorageConnection>, StorageError>;
}

/// Production connector: a plain TCP session to the storage endpoint.
pub struct TcpConnector;

#[async_trait]
impl StorageConnector for TcpConnector {
    async fn connect(
        &self,
        addr: SocketAddr,
        timeout: Duration,
    ) -> Result<Box<dyn StorageConnection>, StorageError> {
        match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(Box::new(TcpStorageConnection { stream })),
            Ok(Err(e)) => Err(StorageError::Io(e)),
            Err(_) => Err(StorageError::Timeout(timeout)),
        }
    }
}

#[derive(Debug)]
struct TcpStorageConnection {
    stream: TcpStream,
}

#[async_trait]
impl StorageConnection for TcpStorageConnection {
    async fn close(mut self: Box<Self>) {
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "Storage socket shutdown failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn connects_to_listening_endpoint() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let conn = TcpConnector
            .connect(addr, Duration::from_secs(1))
            .await
            .unwrap();
        conn.close().await;
    }

    #[tokio::test]
    async fn refused_endpoint_is_io_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = TcpConnector
            .connect(addr, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
