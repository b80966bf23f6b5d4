/// Reasons a single legacy profile document cannot be upgraded.
///
/// These never reach the caller of the upgrade: the document is logged and skipped.
#[crate::tunnelcore_error]
pub enum MigrationError {
    /// The host document has no string `id`
    #[error("missing profile identifier")]
    MissingIdentifier,

    /// No `parameters.sessionConfiguration`, or it does not decode into a configuration
    #[error("missing or invalid OpenVPN configuration")]
    MissingConfiguration,

    /// The session configuration has no string `hostname`
    #[error("missing hostname")]
    MissingHostname,

    /// The session configuration has no list of string `endpointProtocols`
    #[error("missing endpoint protocols")]
    MissingEndpointProtocols,

    /// The provider document has no string `name`
    #[error("missing provider name")]
    MissingProviderName,

    /// The document could not be read or is not a JSON object
    #[error("document {path} is unreadable: {reason}")]
    DocumentUnreadable {
        /// Full path of the document
        path: String,
        /// Flattened cause chain
        reason: String,
    },
}

/// Result type for the per-document transforms
pub type MigrationResult<T> = std::result::Result<T, MigrationError>;
