//! Error handling utilities.
//!
//! Error enums are declared with [`tunnelcore_error`], which derives the `thiserror`,
//! `UniFFI` and `anyhow` plumbing. Code that builds an `anyhow` context chain can turn it
//! into a single readable line with [`ErrorChainExt`].

pub use tunnelcore_macros::tunnelcore_error;

/// Flattens an `anyhow` error chain into one message.
pub trait ErrorChainExt {
    /// Renders `outer (caused by: middle -> root)`.
    fn flatten_chain(&self) -> String;

    /// Same as [`ErrorChainExt::flatten_chain`] with a leading `prefix: `.
    fn flatten_chain_with_prefix(&self, prefix: &str) -> String {
        format!("{prefix}: {}", self.flatten_chain())
    }
}

impl ErrorChainExt for anyhow::Error {
    fn flatten_chain(&self) -> String {
        let mut message = self.to_string();

        let causes: Vec<String> = self.chain().skip(1).map(ToString::to_string).collect();
        if !causes.is_empty() {
            message.push_str(" (caused by: ");
            message.push_str(&causes.join(" -> "));
            message.push(')');
        }

        message
    }
}
