use std::collections::BTreeSet;

use anyhow::{bail, Context};
use serde_json::Value;

use super::error::{MigrationError, MigrationResult};
use super::legacy::{LegacyIndex, LegacyMap};
use crate::error::ErrorChainExt;
use crate::primitives::config::UpgradeConfig;
use crate::primitives::filesystem::{join_path, FileSystem, FileSystemExt};

const HOSTS_FOLDER: &str = "Hosts";
const PROVIDERS_FOLDER: &str = "Providers";
const INDEX_FILE: &str = "ConnectionService.json";
const JSON_EXTENSION: &str = ".json";
const OVPN_EXTENSION: &str = ".ovpn";
const AUTH_USER_PASS_DIRECTIVE: &str = "auth-user-pass";

/// The legacy documents folder inside the shared container.
///
/// ```text
/// <container>/<documents folder>/
///     ConnectionService.json
///     Hosts/<uuid>.json
///     Hosts/<uuid>.ovpn
///     Providers/<name>.json
/// ```
pub struct LegacyContainer<'a> {
    file_system: &'a dyn FileSystem,
    documents: String,
}

impl<'a> LegacyContainer<'a> {
    /// Resolves the documents folder of the configured app group.
    ///
    /// Returns `None` when the platform has no container for the group, meaning there is no
    /// legacy data at all.
    pub fn locate(file_system: &'a dyn FileSystem, config: &UpgradeConfig) -> Option<Self> {
        let root = file_system.container_directory_guarded(&config.app_group())?;
        Some(Self {
            file_system,
            documents: join_path(&root, &config.documents_folder()),
        })
    }

    /// Path of the documents folder.
    #[must_use]
    pub fn documents_path(&self) -> &str {
        &self.documents
    }

    /// Path of the host documents folder.
    #[must_use]
    pub fn hosts_folder(&self) -> String {
        join_path(&self.documents, HOSTS_FOLDER)
    }

    /// Path of the provider documents folder.
    #[must_use]
    pub fn providers_folder(&self) -> String {
        join_path(&self.documents, PROVIDERS_FOLDER)
    }

    /// Path of the index document.
    #[must_use]
    pub fn index_path(&self) -> String {
        join_path(&self.documents, INDEX_FILE)
    }

    /// Reads and parses `ConnectionService.json`.
    ///
    /// # Errors
    /// If the index is missing, unreadable or not a JSON object.
    pub fn read_index(&self) -> anyhow::Result<LegacyIndex> {
        let path = self.index_path();
        let document = self
            .read_json(&path)
            .with_context(|| format!("failed to load index {path}"))?;
        Ok(LegacyIndex::new(document))
    }

    /// Legacy identifiers of the hosts whose `.ovpn` file requests `auth-user-pass`.
    ///
    /// Unreadable `.ovpn` files are logged and left out.
    #[must_use]
    pub fn auth_user_pass_ids(&self) -> BTreeSet<String> {
        let folder = self.hosts_folder();
        let mut ids = BTreeSet::new();

        for file_name in self.files_with_extension(&folder, OVPN_EXTENSION) {
            let path = join_path(&folder, &file_name);
            match self.file_system.read_text(&path) {
                Ok(content) if content.contains(AUTH_USER_PASS_DIRECTIVE) => {
                    if let Some(id) = file_name.strip_suffix(OVPN_EXTENSION) {
                        ids.insert(id.to_string());
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    crate::warn!("profile_migration.ovpn_unreadable file={file_name} error={e}");
                }
            }
        }

        ids
    }

    /// Host document file names, sorted.
    #[must_use]
    pub fn host_documents(&self) -> Vec<String> {
        self.files_with_extension(&self.hosts_folder(), JSON_EXTENSION)
    }

    /// Provider document file names, sorted.
    #[must_use]
    pub fn provider_documents(&self) -> Vec<String> {
        self.files_with_extension(&self.providers_folder(), JSON_EXTENSION)
    }

    /// Reads `folder/file_name` as a JSON object.
    ///
    /// # Errors
    /// `MigrationError::DocumentUnreadable` with the flattened cause.
    pub fn read_document(&self, folder: &str, file_name: &str) -> MigrationResult<LegacyMap> {
        let path = join_path(folder, file_name);
        self.read_json(&path)
            .map_err(|e| MigrationError::DocumentUnreadable {
                reason: e.flatten_chain(),
                path,
            })
    }

    fn read_json(&self, path: &str) -> anyhow::Result<LegacyMap> {
        let text = self
            .file_system
            .read_text(path)
            .context("document is not readable")?;
        let value: Value =
            serde_json::from_str(&text).context("document is not valid JSON")?;
        match value {
            Value::Object(document) => Ok(document),
            _ => bail!("document is not a JSON object"),
        }
    }

    /// Sorted names of the files in `folder` ending with `extension`.
    ///
    /// A folder that cannot be listed counts as empty.
    fn files_with_extension(&self, folder: &str, extension: &str) -> Vec<String> {
        let mut files = match self.file_system.list_files(folder) {
            Ok(files) => files,
            Err(e) => {
                crate::warn!("profile_migration.listing_failed folder={folder} error={e}");
                return Vec::new();
            }
        };
        files.retain(|name| name.ends_with(extension));
        files.sort();
        files
    }
}
