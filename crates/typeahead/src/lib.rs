//! Typeahead — a renderer-agnostic search-as-you-type controller.
//!
//! As the user types, input is debounced, candidate matches are fetched
//! asynchronously from an injected data source, annotated with highlight
//! segments, and navigated with the keyboard or pointer until one is
//! committed. This crate owns the controller logic only; rendering, the
//! concrete data source, and outside-click detection are injected
//! capabilities.
//!
//! # Components
//!
//! - [`highlight`]: pure match-span → segment splitting
//! - [`SuggestionSource`] / [`StaticListSource`]: the data-source capability
//!   and the built-in dataset
//! - [`SuggestionCoordinator`]: debounced fetches with stale-response
//!   protection
//! - [`SelectionController`]: active-row and visibility state machine
//! - [`SearchBox`]: the composition root embedders talk to
//!
//! # Example
//!
//! ```no_run
//! use typeahead::{Key, SearchBox};
//!
//! let mut search = SearchBox::with_default_dataset().with_min_chars(2);
//!
//! search.selected.connect(|value| {
//!     println!("selected: {value}");
//! });
//!
//! // The embedding renderer feeds text edits and keys...
//! search.set_focused(true);
//! search.set_query("san");
//! search.handle_key(Key::ArrowDown);
//!
//! // ...pumps the widget from its event loop...
//! search.poll();
//!
//! // ...and redraws from the snapshot.
//! let snapshot = search.snapshot();
//! for item in &snapshot.items {
//!     for segment in &item.segments {
//!         // segment.highlighted selects the emphasis style
//!     }
//! }
//! ```

pub mod coordinator;
pub mod events;
pub mod highlight;
pub mod search_box;
pub mod selection;
pub mod source;

pub use coordinator::{CoordinatorEvent, FetchPhase, RequestId, SuggestionCoordinator};
pub use events::{Key, OutsideInteractionSource, OutsideSubscription};
pub use highlight::{highlight, MatchSpan, Segment};
pub use search_box::{
    AnnotatedSuggestion, SearchBox, SearchBoxSnapshot, DEFAULT_DEBOUNCE_INTERVAL,
    DEFAULT_MAX_VISIBLE_ITEMS, DEFAULT_MIN_CHARS, DEFAULT_PLACEHOLDER,
};
pub use selection::SelectionController;
pub use source::{
    CaseSensitivity, FetchResult, SourceError, StaticListSource, Suggestion, SuggestionSource,
};

// Re-export the core machinery embedders need to drive the widget.
pub use typeahead_core::{ConnectionId, Debouncer, Signal};
