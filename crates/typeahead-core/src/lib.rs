//! Core systems for Typeahead.
//!
//! This crate provides the foundational components of the Typeahead
//! search-as-you-type toolkit:
//!
//! - **Signal/Slot System**: Type-safe notification between controllers and
//!   the embedding UI layer
//! - **Debounce/Throttle**: Single-slot quiet-period scheduling for keystroke
//!   bursts
//! - **Runtime**: Global Tokio runtime management for asynchronous fetches
//! - **Logging**: `tracing` target constants for per-subsystem filtering
//!
//! # Signal/Slot Example
//!
//! ```
//! use typeahead_core::Signal;
//!
//! let query_changed = Signal::<String>::new();
//!
//! let conn_id = query_changed.connect(|query| {
//!     println!("query is now: {query}");
//! });
//!
//! query_changed.emit("chi".to_string());
//! query_changed.disconnect(conn_id);
//! ```
//!
//! # Debounce Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use typeahead_core::Debouncer;
//!
//! let mut debouncer = Debouncer::new(Duration::from_millis(300));
//! let now = Instant::now();
//! debouncer.schedule("chic".to_string(), now);
//!
//! // The embedding event loop polls; the payload fires once the quiet
//! // period has elapsed with no further schedule.
//! if let Some(query) = debouncer.poll(Instant::now()) {
//!     println!("debounce fired for {query}");
//! }
//! ```

mod error;
pub mod logging;
pub mod runtime;
mod signal;
mod timer;

pub use error::RuntimeError;
pub use runtime::RuntimeConfig;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use timer::{Debouncer, Throttle};
