//! Async runtime management for Typeahead.
//!
//! Suggestion fetches run on a Tokio runtime so a slow data source never
//! blocks the UI thread. This module owns a lazily-initialized global
//! runtime; every consumer in the workspace takes a [`Handle`] rather than
//! the runtime itself, so tests and embeddings with their own runtime can
//! inject one instead.
//!
//! # Example
//!
//! ```
//! use typeahead_core::runtime;
//!
//! // Explicit early init is optional; first use initializes lazily.
//! let handle = runtime::handle();
//! handle.spawn(async { /* fetch work */ });
//! ```

use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};

use crate::error::RuntimeError;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Configuration for the global runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Worker thread count; `None` lets Tokio pick.
    pub worker_threads: Option<usize>,
    /// Name prefix for runtime threads.
    pub thread_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: Some(2),
            thread_name: "typeahead-async".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Set the worker thread count.
    pub fn with_worker_threads(mut self, count: usize) -> Self {
        self.worker_threads = Some(count);
        self
    }

    /// Set the thread name prefix.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

fn build(config: &RuntimeConfig) -> Result<Runtime, RuntimeError> {
    let mut builder = Builder::new_multi_thread();
    builder.thread_name(&config.thread_name);
    if let Some(workers) = config.worker_threads {
        builder.worker_threads(workers);
    }
    builder
        .enable_all()
        .build()
        .map_err(|e| RuntimeError::CreationFailed(e.to_string()))
}

/// Initialize the global runtime with custom configuration.
///
/// Must run before any lazy use; returns [`RuntimeError::AlreadyInitialized`]
/// once a runtime exists.
pub fn init_with(config: RuntimeConfig) -> Result<&'static Runtime, RuntimeError> {
    let runtime = build(&config)?;
    RUNTIME
        .set(runtime)
        .map_err(|_| RuntimeError::AlreadyInitialized)?;
    Ok(RUNTIME.get().expect("runtime was just set"))
}

/// Get the global runtime, initializing it with defaults on first use.
pub fn get() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        build(&RuntimeConfig::default()).expect("failed to create global Typeahead runtime")
    })
}

/// A handle to the global runtime, for spawning fetch work.
pub fn handle() -> Handle {
    get().handle().clone()
}

/// Spawn a future on the global runtime.
pub fn spawn<F>(future: F) -> tokio::task::JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    get().spawn(future)
}

/// Block on a future using the global runtime.
///
/// # Warning
///
/// Do not call this from the UI event loop or from within an async context;
/// it blocks the current thread. Intended for startup code and tests.
pub fn block_on<F: Future>(future: F) -> F::Output {
    get().block_on(future)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_spawns_and_completes() {
        let handle = handle();
        let join = handle.spawn(async { 21 * 2 });
        assert_eq!(block_on(join).unwrap(), 42);
    }

    #[test]
    fn init_after_first_use_is_rejected() {
        let _ = get();
        let err = init_with(RuntimeConfig::default()).unwrap_err();
        assert!(matches!(err, RuntimeError::AlreadyInitialized));
    }
}
