//! Logging facilities for Typeahead.
//!
//! Typeahead instruments itself with the `tracing` crate. To see logs,
//! install a subscriber in the embedding application:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! Controller events are emitted at `trace` level; recovered failures
//! (a rejected data-source fetch) at `warn`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem, e.g.
/// `RUST_LOG=typeahead::coordinator=trace`.
pub mod targets {
    /// Core machinery target.
    pub const CORE: &str = "typeahead_core";
    /// Debounce/throttle scheduling target.
    pub const TIMER: &str = "typeahead_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "typeahead_core::signal";
    /// Suggestion fetch lifecycle target.
    pub const COORDINATOR: &str = "typeahead::coordinator";
    /// Widget composition root target.
    pub const SEARCH_BOX: &str = "typeahead::search_box";
}
