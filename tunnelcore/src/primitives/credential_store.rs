use thiserror::Error;

use super::catch_callback_panic;

/// Errors that can occur when looking up a secret
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Error, uniffi::Error)]
pub enum CredentialStoreError {
    /// No secret is stored for the account in the given context
    #[error("no password found")]
    PasswordNotFound,
    /// The platform refused access to the secret
    #[error("access to the credential store was denied: {0}")]
    AccessDenied(String),
    /// An unexpected error occurred in the foreign callback
    #[error("unexpected error in foreign callback: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for CredentialStoreError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(e.reason)
    }
}

/// Secure secret storage of the device, implemented by the native app.
///
/// On iOS this is the keychain access group shared by the app and its extensions. Secrets
/// are addressed by account name and a context string such as
/// `com.example.vpn.host.6b1f0c5e-...`.
#[uniffi::export(with_foreign)]
pub trait CredentialStore: Send + Sync {
    /// Returns the password stored for `username` under `context`.
    ///
    /// # Errors
    /// - `CredentialStoreError::PasswordNotFound` if there is no such entry
    /// - `CredentialStoreError::AccessDenied` if the platform denies the lookup
    fn password(&self, username: String, context: String) -> Result<String, CredentialStoreError>;
}

/// Guarded access to [`CredentialStore`].
pub trait CredentialStoreExt {
    /// Looks up a password; a panic in the foreign callback becomes
    /// `CredentialStoreError::UnexpectedUniFFICallbackError`.
    ///
    /// # Errors
    /// Any error of [`CredentialStore::password`].
    fn lookup_password(&self, username: &str, context: &str)
        -> Result<String, CredentialStoreError>;
}

impl<T> CredentialStoreExt for T
where
    T: CredentialStore + ?Sized,
{
    fn lookup_password(
        &self,
        username: &str,
        context: &str,
    ) -> Result<String, CredentialStoreError> {
        catch_callback_panic(
            "CredentialStore.password",
            std::panic::AssertUnwindSafe(|| {
                self.password(username.to_string(), context.to_string())
            }),
        )
    }
}

#[cfg(test)]
pub use tests::InMemoryCredentialStore;
