//! Wire types and HTTP clients for the services the CTF reminder bot talks to.
//!
//! - [`objects`]: JSON shapes returned by the CTFtime listing and the Twitter API.
//! - [`oauth`]: OAuth 1.0a (HMAC-SHA1) request signing for Twitter.
//! - `client`: typed `reqwest` clients, gated behind the `client` feature.

#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
pub mod oauth;
