//! hae - Personal memory assistant client
//!
//! Chat with your own memory: tell it facts about the people in your
//! life, and ask questions about them later.
//!
//! ## Key Concepts
//!
//! - **Networks**: One per person/topic; every saved fact lives in one
//! - **Save vs Ask**: Each chat submission either stores a fact or
//!   queries the store, chosen explicitly or inferred by the server
//! - **Remote-first**: State lives on the server; local stores are
//!   caches refreshed after every mutation

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod remote;

pub use crate::auth::{AuthProvider, AuthUser, StoredAuth};
pub use crate::config::Config;
pub use crate::core::backend::MemoryBackend;
pub use crate::core::classifier::{Action, ClassifierMode};
pub use crate::core::session::Session;
pub use crate::remote::{ApiClient, ApiError, ApiResult};
