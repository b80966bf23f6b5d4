//! Legacy Upgrade
//!
//! A one-way, best-effort upgrade of the data written by the previous app generation.
//!
//! # Overview
//!
//! The upgrade consists of:
//! - the preference sweep ([`migrate_legacy_store`]): removes every legacy preference key and
//!   folds the legacy "migrated to v2" marker into a caller-owned flag
//! - the profile migration ([`ProfileUpgrader::migrate_profiles`]): discovers the legacy
//!   host and provider documents in the shared container and converts each one into a
//!   [`Profile`](crate::profile::Profile)
//!
//! Every document is converted on its own. A document that cannot be converted is logged
//! and skipped; it never aborts the batch.
//!
//! # Usage
//!
//! ## Platform Usage (Swift)
//!
//! ```swift
//! let upgrader = ProfileUpgrader(
//!     config: UpgradeConfig(appGroup: appGroup, bundleIdentifier: bundleId),
//!     fileSystem: fileSystem,
//!     keyValueStore: keyValueStore,
//!     credentialStore: credentialStore
//! )
//!
//! // 1. Sweep the legacy preferences, always
//! let didMigrate = upgrader.doMigrateStore(didMigrate: preferences.didMigrate)
//!
//! // 2. Convert the legacy profiles, once
//! if !didMigrate {
//!     for profile in upgrader.exportMigratedProfiles() {
//!         try repository.save(json: profile.json)
//!     }
//!     preferences.didMigrate = true
//! }
//! ```
//!
//! # Legacy layout
//!
//! ```text
//! <app group container>/Documents/
//!     ConnectionService.json      { "hostTitles": { "<uuid>": "<title>" } }
//!     Hosts/<uuid>.json           host profile
//!     Hosts/<uuid>.ovpn           imported configuration file, scanned for `auth-user-pass`
//!     Providers/<name>.json       provider profile
//! ```
//!
//! Secrets live in the credential store under `<bundle id>.host.<uuid>` and
//! `<bundle id>.provider.<name>`.

mod container;
mod credentials;
mod error;
mod host;
mod legacy;
mod provider;
mod shared;
mod store;
mod upgrader;


// Public API exports
pub use container::LegacyContainer;
pub use credentials::migrated_account;
pub use error::{MigrationError, MigrationResult};
pub use host::migrate_host_profile;
pub use legacy::{LegacyIndex, LegacyMap, LegacyMapExt, LegacyProfileKind};
pub use provider::migrate_provider_profile;
pub use shared::{migrated_network_settings, migrated_on_demand};
pub use store::{migrate_legacy_store, LegacyStoreKey};
pub use upgrader::{
    MigratedProfile, ProfileMigrationReport, ProfileMigrationSummary, ProfileUpgrader,
    SkippedDocument, UpgradeStrategy,
};
