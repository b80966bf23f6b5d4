/// Introduces a key-value store primitive implemented by the native app.
pub mod key_value_store;

/// Introduces a read-only filesystem primitive implemented by the native app.
pub mod filesystem;

/// Introduces a credential (keychain) primitive implemented by the native app.
pub mod credential_store;

/// Introduces logging functionality that can be integrated with foreign language bindings.
pub mod logger;

/// Configuration of the upgrade, provided by the native app.
pub mod config;

/// Invokes a foreign callback, turning a panic into the primitive's callback error.
///
/// Foreign exceptions that cannot be represented in the return type (e.g. Kotlin
/// `CancellationException`) make UniFFI panic while lifting the value.
pub(crate) fn catch_callback_panic<T, E, F>(operation: &str, f: F) -> Result<T, E>
where
    E: From<uniffi::UnexpectedUniFFICallbackError>,
    F: FnOnce() -> Result<T, E> + std::panic::UnwindSafe,
{
    std::panic::catch_unwind(f).map_or_else(
        |_| {
            Err(uniffi::UnexpectedUniFFICallbackError::new(format!(
                "panic in {operation} callback"
            ))
            .into())
        },
        |result| result,
    )
}
