//! Session state management for the Maison Manoé client.
//!
//! `SessionStore` keeps the bearer credential (token, token type, cached
//! user profile) across an ordered list of storage scopes. Reads walk the
//! scopes durable-first; writes land in the scope selected by the caller's
//! "remember me" choice at login.

pub mod session;

pub use session::SessionStore;
