//! Key-value storage ports for session state.
//!
//! The original front-end keeps its credential in two browser stores:
//! `localStorage` (survives restarts) and `sessionStorage` (cleared at
//! session end). Here both are instances of the [`KeyValueStorage`] trait so
//! the session layer stays agnostic of where the bytes live:
//!
//! - [`MemoryStorage`]: in-process map, the ephemeral scope
//! - [`FileStorage`]: JSON file under the config directory, the default
//!   durable scope
//! - [`KeyringStorage`]: OS keychain, the opt-in durable scope

pub mod file;
pub mod keyring;
pub mod memory;

pub use self::file::FileStorage;
pub use self::keyring::KeyringStorage;
pub use self::memory::MemoryStorage;

use anyhow::Result;

/// Lifetime of a storage scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// Survives across program runs.
    Durable,
    /// Lives for the current session only.
    Ephemeral,
}

impl std::fmt::Display for StorageScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageScope::Durable => write!(f, "durable"),
            StorageScope::Ephemeral => write!(f, "ephemeral"),
        }
    }
}

/// String key-value store backing one storage scope.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
