use std::sync::Arc;

use chrono::Utc;

use super::container::LegacyContainer;
use super::error::MigrationResult;
use super::host::migrate_host_profile;
use super::legacy::LegacyProfileKind;
use super::provider::migrate_provider_profile;
use super::store::migrate_legacy_store;
use crate::error::ErrorChainExt;
use crate::primitives::config::UpgradeConfig;
use crate::primitives::credential_store::CredentialStore;
use crate::primitives::filesystem::FileSystem;
use crate::primitives::key_value_store::KeyValueStore;
use crate::profile::Profile;
use crate::tunnelcore_export;

/// One-shot upgrade from the legacy app generation.
pub trait UpgradeStrategy {
    /// Sweeps the legacy preferences, folding the legacy "migrated to v2" marker into
    /// `did_migrate`.
    fn do_migrate_store(&self, did_migrate: &mut bool);

    /// Converts every legacy profile document that can be converted. Never fails: documents
    /// that cannot be converted are logged and skipped.
    fn migrated_profiles_to_v2(&self) -> Vec<Profile>;
}

/// A legacy document left out of the upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    /// Host or provider document.
    pub kind: LegacyProfileKind,
    /// File name inside its folder.
    pub file_name: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Counters of a profile migration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileMigrationSummary {
    /// Host documents discovered
    pub hosts_found: usize,
    /// Provider documents discovered
    pub providers_found: usize,
    /// Profiles produced
    pub migrated: usize,
    /// Documents skipped
    pub skipped: usize,
}

/// Outcome of [`ProfileUpgrader::migrate_profiles`].
#[derive(Debug, Default)]
pub struct ProfileMigrationReport {
    /// Migrated profiles, hosts first, each group in file name order.
    pub profiles: Vec<Profile>,
    /// Documents that could not be migrated.
    pub skipped: Vec<SkippedDocument>,
    /// Counters of the run.
    pub summary: ProfileMigrationSummary,
}

impl ProfileMigrationReport {
    fn record(
        &mut self,
        kind: LegacyProfileKind,
        file_name: String,
        result: MigrationResult<Profile>,
    ) {
        match kind {
            LegacyProfileKind::Host => self.summary.hosts_found += 1,
            LegacyProfileKind::Provider => self.summary.providers_found += 1,
        }

        match result {
            Ok(profile) => {
                crate::debug!(
                    "profile_migration.migrated kind={kind} file={file_name} profile_id={}",
                    profile.id()
                );
                self.summary.migrated += 1;
                self.profiles.push(profile);
            }
            Err(e) => {
                crate::warn!("profile_migration.skipped kind={kind} file={file_name} reason={e}");
                self.summary.skipped += 1;
                self.skipped.push(SkippedDocument {
                    kind,
                    file_name,
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// A migrated profile ready to be stored by the native profile repository.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct MigratedProfile {
    /// New profile identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Provider name, only for provider profiles
    pub provider_name: Option<String>,
    /// The profile serialized as JSON
    pub json: String,
}

/// Upgrades the legacy preferences and profile documents using the platform primitives.
///
/// # Examples
///
/// ## Swift
///
/// ```swift
/// let upgrader = ProfileUpgrader(
///     config: UpgradeConfig(appGroup: appGroup, bundleIdentifier: bundleId),
///     fileSystem: FileManagerFileSystem(),
///     keyValueStore: UserDefaultsStore(suiteName: appGroup),
///     credentialStore: KeychainCredentialStore(group: appGroup)
/// )
/// let didMigrate = upgrader.doMigrateStore(didMigrate: settings.didMigrate)
/// if !didMigrate {
///     try repository.save(upgrader.exportMigratedProfiles())
/// }
/// ```
#[derive(uniffi::Object)]
pub struct ProfileUpgrader {
    config: Arc<UpgradeConfig>,
    file_system: Arc<dyn FileSystem>,
    key_value_store: Arc<dyn KeyValueStore>,
    credential_store: Arc<dyn CredentialStore>,
}

#[tunnelcore_export]
impl ProfileUpgrader {
    /// Creates an upgrader over the given primitives.
    #[uniffi::constructor]
    #[must_use]
    pub fn new(
        config: Arc<UpgradeConfig>,
        file_system: Arc<dyn FileSystem>,
        key_value_store: Arc<dyn KeyValueStore>,
        credential_store: Arc<dyn CredentialStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            file_system,
            key_value_store,
            credential_store,
        })
    }

    /// Sweeps the legacy preferences and returns the updated "did migrate" flag.
    ///
    /// A `true` input is returned unchanged; a `false` input becomes the legacy marker.
    #[must_use]
    pub fn do_migrate_store(&self, did_migrate: bool) -> bool {
        let mut did_migrate = did_migrate;
        UpgradeStrategy::do_migrate_store(self, &mut did_migrate);
        did_migrate
    }

    /// Migrates the legacy profile documents and serializes each profile for the native store.
    #[must_use]
    pub fn export_migrated_profiles(&self) -> Vec<MigratedProfile> {
        self.migrate_profiles()
            .profiles
            .into_iter()
            .filter_map(|profile| match profile.to_json() {
                Ok(json) => Some(MigratedProfile {
                    id: profile.id().to_string(),
                    name: profile.name().to_string(),
                    provider_name: profile.header.provider_name.clone(),
                    json,
                }),
                Err(e) => {
                    crate::error!(
                        "profile_migration.serialization_failed profile_id={} error={e}",
                        profile.id()
                    );
                    None
                }
            })
            .collect()
    }
}

impl ProfileUpgrader {
    /// Migrates every legacy host and provider document.
    ///
    /// A missing container yields an empty report. A missing or invalid index skips the host
    /// documents only; provider documents are still migrated.
    #[must_use]
    pub fn migrate_profiles(&self) -> ProfileMigrationReport {
        let started_at = Utc::now();
        let mut report = ProfileMigrationReport::default();

        crate::info!(
            "profile_migration.started app_group={} timestamp={}",
            self.config.app_group(),
            started_at.to_rfc3339()
        );

        let Some(container) =
            LegacyContainer::locate(self.file_system.as_ref(), self.config.as_ref())
        else {
            crate::info!(
                "profile_migration.no_container app_group={}",
                self.config.app_group()
            );
            return report;
        };
        crate::debug!(
            "profile_migration.container_located documents={}",
            container.documents_path()
        );

        self.migrate_hosts(&container, &mut report);
        self.migrate_providers(&container, &mut report);

        let summary = report.summary;
        crate::info!(
            "profile_migration.completed hosts_found={} providers_found={} migrated={} skipped={} duration_ms={} timestamp={}",
            summary.hosts_found,
            summary.providers_found,
            summary.migrated,
            summary.skipped,
            (Utc::now() - started_at).num_milliseconds(),
            Utc::now().to_rfc3339()
        );

        report
    }

    fn migrate_hosts(&self, container: &LegacyContainer<'_>, report: &mut ProfileMigrationReport) {
        let index = match container.read_index() {
            Ok(index) => index,
            Err(e) => {
                crate::warn!(
                    "profile_migration.index_unreadable reason={}",
                    e.flatten_chain()
                );
                return;
            }
        };

        let auth_user_pass_ids = container.auth_user_pass_ids();
        let folder = container.hosts_folder();

        for file_name in container.host_documents() {
            let result = container
                .read_document(&folder, &file_name)
                .and_then(|document| {
                    migrate_host_profile(
                        &index,
                        &document,
                        &auth_user_pass_ids,
                        &self.config,
                        self.credential_store.as_ref(),
                    )
                });
            report.record(LegacyProfileKind::Host, file_name, result);
        }
    }

    fn migrate_providers(
        &self,
        container: &LegacyContainer<'_>,
        report: &mut ProfileMigrationReport,
    ) {
        let folder = container.providers_folder();

        for file_name in container.provider_documents() {
            let result = container
                .read_document(&folder, &file_name)
                .and_then(|document| {
                    migrate_provider_profile(
                        &document,
                        &self.config,
                        self.credential_store.as_ref(),
                    )
                });
            report.record(LegacyProfileKind::Provider, file_name, result);
        }
    }
}

impl UpgradeStrategy for ProfileUpgrader {
    fn do_migrate_store(&self, did_migrate: &mut bool) {
        migrate_legacy_store(self.key_value_store.as_ref(), did_migrate);
    }

    fn migrated_profiles_to_v2(&self) -> Vec<Profile> {
        self.migrate_profiles().profiles
    }
}
