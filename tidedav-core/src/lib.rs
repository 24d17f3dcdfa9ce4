//! Tidedav Core - TorrServer client and WebDAV path resolution
//!
//! This crate provides the protocol-free building blocks of the bridge:
//! configuration, the TorrServer backend client, the torrent/file data
//! model, the path resolver and the content-type table.

pub mod backend;
pub mod config;
pub mod content_type;
pub mod resolver;
pub mod torrent;

// Re-export main types for convenient access
pub use backend::{BackendClient, BackendStream, HttpBackendClient};
pub use config::{BridgeConfig, Credentials};
pub use resolver::{Missing, Resolved, resolve};
pub use torrent::{FileEntry, Torrent, etag, flatten_path};

/// Errors raised when talking to the TorrServer backend.
///
/// Listing failures are swallowed by the client (an unreachable backend
/// degrades to "no torrents"); these surface only from stream-open and ping.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid backend URL: {url}")]
    InvalidUrl { url: String },
}

pub type Result<T> = std::result::Result<T, BackendError>;
