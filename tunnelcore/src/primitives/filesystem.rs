use thiserror::Error;

use super::catch_callback_panic;

/// Errors that can occur during filesystem operations
#[derive(Debug, Error, uniffi::Error)]
pub enum FileSystemError {
    /// Tried to read a file that doesn't exist
    #[error("requested file does not exist")]
    FileDoesNotExist,
    /// Tried to list a directory that doesn't exist
    #[error("requested directory does not exist")]
    DirectoryDoesNotExist,
    /// Something went wrong with the filesystem operation
    #[error("IO failure: {0}")]
    IoFailure(String),
    /// The file content is not valid UTF-8 text
    #[error("file is not valid UTF-8")]
    InvalidUtf8,
    /// Unexpected UniFFI callback error
    #[error("unexpected uniffi callback error: {0}")]
    UnexpectedUniFFICallbackError(String),
}

/// Converts unexpected UniFFI callback errors to `FileSystemError`.
///
/// When the native implementation of [`FileSystem`] hits an unhandled exception, UniFFI
/// reports it through this conversion instead of panicking on the Rust side.
impl From<uniffi::UnexpectedUniFFICallbackError> for FileSystemError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(error.reason)
    }
}

/// Read-only view of the device filesystem, implemented by the native side.
///
/// All paths are absolute paths as understood by the native side. Paths are built by
/// joining segments with `/`.
#[uniffi::export(with_foreign)]
pub trait FileSystem: Send + Sync {
    /// Resolves the root directory of the shared container of an app group.
    ///
    /// Returns `None` when the container does not exist on this device (e.g. fresh install
    /// or a platform without app groups).
    fn container_directory(&self, app_group: String) -> Option<String>;

    /// List files in a specific directory. No recursion and no subdirectories are returned.
    ///
    /// # Notes
    /// Files are returned without the directory path. Only the file name is returned.
    ///
    /// # Errors
    /// - `FileSystemError::DirectoryDoesNotExist` if the directory is missing
    /// - `FileSystemError::IoFailure` if the directory cannot be listed
    fn list_files_at_directory(
        &self,
        folder_path: String,
    ) -> Result<Vec<String>, FileSystemError>;

    /// Read file contents
    ///
    /// # Errors
    /// - `FileSystemError::IoFailure` if the file cannot be read
    /// - `FileSystemError::FileDoesNotExist` if the file doesn't exist
    fn read_file(&self, file_path: String) -> Result<Vec<u8>, FileSystemError>;
}

/// Extension helpers for `FileSystem`.
///
/// Every helper guards the foreign call, so a panic raised while lifting a
/// foreign result surfaces as `FileSystemError::UnexpectedUniFFICallbackError`.
pub trait FileSystemExt {
    /// Guarded [`FileSystem::container_directory`]. A panicking callback counts as "no container".
    fn container_directory_guarded(&self, app_group: &str) -> Option<String>;

    /// Guarded [`FileSystem::list_files_at_directory`].
    ///
    /// # Errors
    /// Any error of the underlying implementation.
    fn list_files(&self, folder_path: &str) -> Result<Vec<String>, FileSystemError>;

    /// Guarded [`FileSystem::read_file`].
    ///
    /// # Errors
    /// Any error of the underlying implementation.
    fn read_bytes(&self, file_path: &str) -> Result<Vec<u8>, FileSystemError>;

    /// Reads a file as UTF-8 text.
    ///
    /// # Errors
    /// - `FileSystemError::InvalidUtf8` if the content is not UTF-8
    /// - any error of [`FileSystemExt::read_bytes`]
    fn read_text(&self, file_path: &str) -> Result<String, FileSystemError>;
}

impl<T> FileSystemExt for T
where
    T: FileSystem + ?Sized,
{
    fn container_directory_guarded(&self, app_group: &str) -> Option<String> {
        catch_callback_panic(
            "FileSystem.container_directory",
            std::panic::AssertUnwindSafe(|| {
                Ok::<_, FileSystemError>(self.container_directory(app_group.to_string()))
            }),
        )
        .ok()
        .flatten()
    }

    fn list_files(&self, folder_path: &str) -> Result<Vec<String>, FileSystemError> {
        catch_callback_panic(
            "FileSystem.list_files_at_directory",
            std::panic::AssertUnwindSafe(|| {
                self.list_files_at_directory(folder_path.to_string())
            }),
        )
    }

    fn read_bytes(&self, file_path: &str) -> Result<Vec<u8>, FileSystemError> {
        catch_callback_panic(
            "FileSystem.read_file",
            std::panic::AssertUnwindSafe(|| self.read_file(file_path.to_string())),
        )
    }

    fn read_text(&self, file_path: &str) -> Result<String, FileSystemError> {
        let bytes = self.read_bytes(file_path)?;
        String::from_utf8(bytes).map_err(|_| FileSystemError::InvalidUtf8)
    }
}

/// Joins path segments with `/`, ignoring redundant separators.
#[must_use]
pub fn join_path(base: &str, component: &str) -> String {
    let base = base.trim_end_matches('/');
    let component = component.trim_start_matches('/');
    if base.is_empty() {
        format!("/{component}")
    } else {
        format!("{base}/{component}")
    }
}

// Re-export InMemoryFileSystem for tests
#[cfg(test)]
pub use tests::InMemoryFileSystem;
