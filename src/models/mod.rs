//! Data models for the Maison Manoé auth API.
//!
//! - `UserProfile`: the account payload returned by `/api/auth/me`
//! - `TokenResponse`: the login payload (`access_token` + `token_type`)
//! - `RegisterRequest`: the registration payload for `/api/auth/register`

pub mod user;

pub use user::{RegisterRequest, TokenResponse, UserProfile};
