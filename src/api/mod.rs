//! HTTP client module for the Maison Manoé auth API.
//!
//! `ApiClient` attaches the stored bearer token to outgoing requests,
//! converts 401 responses into a cleared session plus a login redirect, and
//! implements the register/login/profile operations against the fixed
//! `/api/auth/*` endpoints.

pub mod client;
pub mod error;

pub use client::{ApiClient, LoginOutcome};
pub use error::ApiError;
