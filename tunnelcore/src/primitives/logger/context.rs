use std::cell::RefCell;

thread_local! {
    static LOG_CONTEXT: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// A scope guard that sets a logging context and restores the previous one when dropped.
///
/// # Examples
///
/// ```rust
/// use tunnelcore::primitives::logger::LogContext;
///
/// {
///     let _ctx = LogContext::new("ProfileUpgrader");
///     tunnelcore::info!("prefixed with [ProfileUpgrader]");
/// }
/// ```
pub struct LogContext {
    previous: Option<String>,
}

impl LogContext {
    /// Opens a logging context scope, active until the returned guard is dropped.
    #[must_use]
    pub fn new(module: &str) -> Self {
        let previous = LOG_CONTEXT.with(|ctx| ctx.borrow_mut().replace(format!("[{module}]")));
        Self { previous }
    }
}

impl Drop for LogContext {
    fn drop(&mut self) {
        LOG_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.take();
        });
    }
}

/// Gets the current logging context, if any.
#[must_use]
pub fn get_context() -> Option<String> {
    LOG_CONTEXT.with(|ctx| ctx.borrow().clone())
}
