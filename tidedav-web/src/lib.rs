//! Tidedav Web - Read-only WebDAV server over a TorrServer backend
//!
//! Exposes the backend's torrent list as a two-level WebDAV tree: root,
//! one collection per torrent, flat file resources inside. PROPFIND
//! browses, GET/HEAD stream, everything write-shaped is a stub.

pub mod auth;
pub mod dav;
pub mod health;
pub mod server;

// Re-export main types
pub use server::{AppState, router, run_server};
