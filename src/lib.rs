//! Client-side session and authentication layer for the Maison Manoé API.
//!
//! This crate manages a bearer credential (token, token type, cached user
//! profile) across two key-value storage scopes — durable and ephemeral,
//! selected by a "remember me" flag at login — and provides an API client
//! that attaches the token to outgoing requests, handles 401 responses by
//! clearing the session and emitting a login redirect, and performs
//! login/registration/profile calls against the shop's auth endpoints.
//!
//! Browser-global collaborators of the original front-end are injected as
//! ports so they can be faked in tests:
//!
//! - [`KeyValueStorage`]: the two storage scopes (memory, file, OS keychain)
//! - [`Navigator`]: full-page redirects, reduced to explicit intents
//! - [`AuthUi`]: visibility toggles and user-text injection

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod navigation;
pub mod storage;
pub mod ui;

pub use api::{ApiClient, ApiError, LoginOutcome};
pub use auth::SessionStore;
pub use config::Config;
pub use models::{RegisterRequest, TokenResponse, UserProfile};
pub use navigation::{NavigationIntent, Navigator};
pub use storage::{FileStorage, KeyValueStorage, KeyringStorage, MemoryStorage, StorageScope};
pub use ui::{update_auth_ui, AuthUi};
