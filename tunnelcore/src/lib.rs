#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

//! `tunnelcore` is the platform-independent core of the VPN app.
//!
//! It upgrades the legacy, loosely-typed profile store (JSON documents in the shared
//! app-group container plus secrets in the platform keychain) into the typed [`profile`]
//! model. Platform services are injected by the native app through the traits in
//! [`primitives`].

/// Introduces low level primitives implemented by the native app: filesystem,
/// key-value store, credential store, logging and configuration.
pub mod primitives;

/// The typed profile model produced by the upgrade.
pub mod profile;

/// One-shot upgrade of the legacy preferences and profile documents.
pub mod migration;

/// Shared error helpers and the `#[tunnelcore_error]` attribute.
pub mod error;

pub use tunnelcore_macros::{tunnelcore_error, tunnelcore_export};

uniffi::setup_scaffolding!("tunnelcore");
