//! Custom lists
//!
//! Named value lists (blocklists, allowlists, watchlists) that rules query
//! through `CustomListAccess`. Each list is served by a [`ListBackend`].

pub mod backend;
pub mod service;

pub use backend::{ListBackend, MemoryBackend};
pub use service::ListService;
