use crate::tunnelcore_export;

/// Folder of the shared container that holds the legacy documents.
pub const DEFAULT_DOCUMENTS_FOLDER: &str = "Documents";

/// Identifiers the upgrade needs to locate legacy data on the device.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Object)]
pub struct UpgradeConfig {
    app_group: String,
    bundle_identifier: String,
    documents_folder: String,
}

#[tunnelcore_export]
impl UpgradeConfig {
    /// Creates a configuration with the default documents folder.
    ///
    /// # Arguments
    /// * `app_group` - Identifier of the shared container, e.g. `group.com.example.vpn`
    /// * `bundle_identifier` - Bundle identifier of the app that wrote the legacy keychain items
    ///
    /// # Examples
    ///
    /// ## Swift
    ///
    /// ```swift
    /// let config = UpgradeConfig(
    ///     appGroup: "group.com.example.vpn",
    ///     bundleIdentifier: Bundle.main.bundleIdentifier!
    /// )
    /// ```
    #[uniffi::constructor]
    #[must_use]
    pub fn new(app_group: String, bundle_identifier: String) -> Self {
        Self {
            app_group,
            bundle_identifier,
            documents_folder: DEFAULT_DOCUMENTS_FOLDER.to_string(),
        }
    }

    /// Creates a configuration whose legacy documents live in a custom folder of the container.
    #[uniffi::constructor]
    #[must_use]
    pub fn with_documents_folder(
        app_group: String,
        bundle_identifier: String,
        documents_folder: String,
    ) -> Self {
        crate::debug!("using custom documents folder: {documents_folder}");
        Self {
            app_group,
            bundle_identifier,
            documents_folder,
        }
    }

    /// Shared container identifier.
    #[must_use]
    pub fn app_group(&self) -> String {
        self.app_group.clone()
    }

    /// Bundle identifier used to build keychain contexts.
    #[must_use]
    pub fn bundle_identifier(&self) -> String {
        self.bundle_identifier.clone()
    }

    /// Folder of the container holding the legacy documents.
    #[must_use]
    pub fn documents_folder(&self) -> String {
        self.documents_folder.clone()
    }
}

impl UpgradeConfig {
    /// Keychain context of a legacy profile: `<bundle id>.<profile type>.<profile id>`.
    #[must_use]
    pub fn credential_context(&self, profile_type: &str, profile_id: &str) -> String {
        [self.bundle_identifier.as_str(), profile_type, profile_id].join(".")
    }
}
