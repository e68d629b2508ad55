//! The search-as-you-type composition root.
//!
//! [`SearchBox`] wires the debounced [`SuggestionCoordinator`] and the
//! [`SelectionController`] together and exposes the whole public contract to
//! the embedding UI layer: configuration, input events, signals, and a
//! rendering-facing state snapshot.
//!
//! The widget is renderer-agnostic. The embedding text field feeds edits via
//! [`set_query`](SearchBox::set_query) and navigation keys via
//! [`handle_key`](SearchBox::handle_key), pumps
//! [`poll`](SearchBox::poll) from its event loop, and redraws from
//! [`snapshot`](SearchBox::snapshot).
//!
//! # Example
//!
//! ```no_run
//! use typeahead::{Key, SearchBox};
//!
//! let mut search = SearchBox::with_default_dataset();
//! search.selected.connect(|value| {
//!     println!("selected: {value}");
//! });
//!
//! search.set_focused(true);
//! search.set_query("chi");
//! loop {
//!     search.poll();
//!     let snapshot = search.snapshot();
//!     if !snapshot.is_loading && snapshot.is_open {
//!         break;
//!     }
//! }
//! search.handle_key(Key::ArrowDown);
//! search.handle_key(Key::Enter);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;

use typeahead_core::{runtime, Signal};

use crate::coordinator::{CoordinatorEvent, FetchPhase, SuggestionCoordinator};
use crate::events::{Key, OutsideInteractionSource, OutsideSubscription};
use crate::highlight::{highlight, Segment};
use crate::selection::SelectionController;
use crate::source::{StaticListSource, SuggestionSource};

/// Default minimum query length before suggestions appear.
pub const DEFAULT_MIN_CHARS: usize = 2;
/// Default quiet period between the last keystroke and the fetch.
pub const DEFAULT_DEBOUNCE_INTERVAL: Duration = Duration::from_millis(300);
/// Default maximum number of visible suggestion rows.
pub const DEFAULT_MAX_VISIBLE_ITEMS: usize = 7;
/// Default placeholder text.
pub const DEFAULT_PLACEHOLDER: &str = "Start typing...";

// ============================================================================
// Input Mode
// ============================================================================

/// Whether the displayed value is owned internally or dictated externally.
///
/// The two variants are mutually exclusive by construction: a live query
/// only exists while free-typing, and a committed external value suppresses
/// every operation except clearing it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputMode {
    /// The user types freely; the widget owns the query.
    FreeTyping { query: String },
    /// An external caller committed a value; the input is disabled.
    Committed { value: String },
}

// ============================================================================
// Snapshot
// ============================================================================

/// One suggestion annotated with its highlight segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedSuggestion {
    /// The suggestion value.
    pub value: String,
    /// Highlighted/plain runs covering `value`.
    pub segments: Vec<Segment>,
}

/// Rendering-facing state, consumed by the external renderer each update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBoxSnapshot {
    /// The text to display in the input field.
    pub query: String,
    /// Placeholder shown while the query is empty.
    pub placeholder: String,
    /// Current suggestions, segment-annotated for highlighting.
    pub items: Vec<AnnotatedSuggestion>,
    /// Whether a fetch is in flight.
    pub is_loading: bool,
    /// Whether the suggestion list is visible.
    pub is_open: bool,
    /// Active row (-1 means none).
    pub active_index: i32,
    /// The rows the renderer should draw.
    pub visible_range: std::ops::Range<usize>,
    /// Whether the input is disabled (external selection present).
    pub disabled: bool,
    /// Whether the input currently holds focus.
    pub focused: bool,
}

// ============================================================================
// Search Box
// ============================================================================

/// Search-as-you-type input controller.
///
/// # Signals
///
/// - `selected(String)`: a suggestion was committed, or `""` after the
///   external selection was cleared
/// - `highlighted(String)`: the active suggestion changed
/// - `focus_requested(())`: the renderer should focus the input (emitted
///   when clearing an external selection hands control back)
///
/// # Teardown
///
/// Dropping the widget cancels the pending debounce, releases the
/// outside-interaction subscription, and drops the fetch completion channel,
/// so an in-flight fetch resolving afterwards is ignored.
pub struct SearchBox {
    /// Free-typing or externally committed.
    mode: InputMode,
    /// Placeholder for the embedding input field.
    placeholder: String,
    /// Whether the input holds focus.
    focused: bool,
    /// Set while waiting for the external caller to drop the committed
    /// value after a clear; triggers `focus_requested` when it does.
    pending_focus_restore: bool,

    /// Query→suggestions lifecycle.
    coordinator: SuggestionCoordinator,
    /// Active-row and visibility state machine.
    selection: SelectionController,

    /// Raised by the outside-interaction handler, consumed by `poll`.
    outside_clicked: Arc<AtomicBool>,
    /// Held subscription to the injected outside-interaction source.
    outside_subscription: Option<OutsideSubscription>,

    /// Signal emitted on commit and on clear (`""` means cleared).
    pub selected: Signal<String>,
    /// Signal emitted when the active suggestion changes.
    pub highlighted: Signal<String>,
    /// Signal asking the renderer to focus the input.
    pub focus_requested: Signal<()>,
}

impl SearchBox {
    /// Create a search box over `source`, fetching on `runtime`.
    pub fn new(source: Arc<dyn SuggestionSource>, runtime: Handle) -> Self {
        Self {
            mode: InputMode::FreeTyping {
                query: String::new(),
            },
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            focused: false,
            pending_focus_restore: false,
            coordinator: SuggestionCoordinator::new(
                DEFAULT_MIN_CHARS,
                DEFAULT_DEBOUNCE_INTERVAL,
                source,
                runtime,
            ),
            selection: SelectionController::new(DEFAULT_MAX_VISIBLE_ITEMS),
            outside_clicked: Arc::new(AtomicBool::new(false)),
            outside_subscription: None,
            selected: Signal::new(),
            highlighted: Signal::new(),
            focus_requested: Signal::new(),
        }
    }

    /// Create a search box over the built-in dataset and global runtime.
    pub fn with_default_dataset() -> Self {
        Self::new(
            Arc::new(StaticListSource::with_default_dataset()),
            runtime::handle(),
        )
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Set the minimum query length using builder pattern.
    pub fn with_min_chars(mut self, count: usize) -> Self {
        self.coordinator.set_min_chars(count);
        self
    }

    /// Set the debounce quiet period using builder pattern.
    pub fn with_debounce_interval(mut self, interval: Duration) -> Self {
        self.coordinator.set_debounce_interval(interval);
        self
    }

    /// Set the placeholder text using builder pattern.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the maximum number of visible rows using builder pattern.
    pub fn with_max_visible_items(mut self, count: usize) -> Self {
        self.selection.set_max_visible_items(count);
        self
    }

    /// Minimum query length before suggestions appear.
    pub fn min_chars(&self) -> usize {
        self.coordinator.min_chars()
    }

    /// The placeholder text.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    // =========================================================================
    // State Access
    // =========================================================================

    /// The text the input field should display.
    pub fn query(&self) -> &str {
        match &self.mode {
            InputMode::FreeTyping { query } => query,
            InputMode::Committed { value } => value,
        }
    }

    /// Whether an external selection is present (input disabled).
    pub fn is_disabled(&self) -> bool {
        matches!(self.mode, InputMode::Committed { .. })
    }

    /// Whether the suggestion list is visible.
    pub fn is_open(&self) -> bool {
        self.selection.is_open()
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.coordinator.is_loading()
    }

    /// The active row (-1 means none).
    pub fn active_index(&self) -> i32 {
        self.selection.active_index()
    }

    /// Where the coordinator is in the current query lifecycle.
    pub fn fetch_phase(&self) -> FetchPhase {
        self.coordinator.phase()
    }

    /// Fire time of the pending debounce, so the embedding event loop can
    /// sleep until exactly the next deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.coordinator.next_deadline()
    }

    /// Build the rendering-facing snapshot.
    pub fn snapshot(&self) -> SearchBoxSnapshot {
        let items: Vec<AnnotatedSuggestion> = self
            .coordinator
            .items()
            .iter()
            .map(|suggestion| AnnotatedSuggestion {
                value: suggestion.value.clone(),
                segments: highlight(&suggestion.value, &suggestion.spans),
            })
            .collect();
        SearchBoxSnapshot {
            query: self.query().to_string(),
            placeholder: self.placeholder.clone(),
            visible_range: self.selection.visible_range(items.len()),
            items,
            is_loading: self.coordinator.is_loading(),
            is_open: self.selection.is_open(),
            active_index: self.selection.active_index(),
            disabled: self.is_disabled(),
            focused: self.focused,
        }
    }

    // =========================================================================
    // Input Events
    // =========================================================================

    /// Record a focus change from the renderer.
    ///
    /// Regaining focus re-opens the list when the current query already has
    /// something to show.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused && !self.is_disabled() && self.meets_gate() && self.coordinator.has_candidates()
        {
            self.selection.open();
        }
    }

    /// Feed the input field's new text.
    ///
    /// Inert while an external selection is present.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.set_query_at(text, Instant::now());
    }

    /// [`set_query`](Self::set_query) with an explicit clock, for
    /// deterministic driving.
    pub fn set_query_at(&mut self, text: impl Into<String>, now: Instant) {
        if self.is_disabled() {
            tracing::trace!(target: "typeahead::search_box", "typing suppressed while committed");
            return;
        }
        let text = text.into();
        self.coordinator.on_query_changed(&text, now);
        let meets_gate = text.chars().count() >= self.coordinator.min_chars();
        self.mode = InputMode::FreeTyping { query: text };
        self.selection
            .on_query_changed(meets_gate, self.coordinator.has_candidates());
    }

    /// Handle a navigation key. Returns `true` when the key was consumed.
    ///
    /// Inert while an external selection is present.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if self.is_disabled() {
            return false;
        }
        let count = self.coordinator.items().len();
        match key {
            Key::ArrowDown => {
                if !self.selection.is_open() {
                    return false;
                }
                let before = self.selection.active_index();
                self.selection.move_down(count);
                self.emit_highlighted_if_moved(before);
                true
            }
            Key::ArrowUp => {
                if !self.selection.is_open() {
                    return false;
                }
                let before = self.selection.active_index();
                self.selection.move_up();
                self.emit_highlighted_if_moved(before);
                true
            }
            Key::Enter => match self.selection.commit_target(count) {
                Some(index) => {
                    let value = self.coordinator.items()[index].value.clone();
                    self.commit(value);
                    true
                }
                None => false,
            },
            Key::Escape => {
                if !self.selection.is_open() {
                    return false;
                }
                self.selection.close_and_reset();
                true
            }
        }
    }

    /// Make `index` the active row (pointer hover).
    ///
    /// Inert while an external selection is present.
    pub fn hover(&mut self, index: usize) {
        if self.is_disabled() || index >= self.coordinator.items().len() {
            return;
        }
        let before = self.selection.active_index();
        self.selection.hover(index);
        self.emit_highlighted_if_moved(before);
    }

    /// Commit row `index` (pointer click). Same semantics as Enter on an
    /// active row.
    ///
    /// Inert while an external selection is present.
    pub fn activate(&mut self, index: usize) {
        if self.is_disabled() {
            return;
        }
        if let Some(suggestion) = self.coordinator.items().get(index) {
            let value = suggestion.value.clone();
            self.commit(value);
        }
    }

    /// Close the list after a pointer interaction outside the widget.
    ///
    /// The active row keeps its value; it is irrelevant while closed.
    pub fn handle_outside_interaction(&mut self) {
        if self.is_disabled() {
            return;
        }
        self.selection.close();
    }

    /// Acquire a scoped subscription on the injected outside-interaction
    /// capability; the previous subscription, if any, is released.
    ///
    /// The handler only raises a flag; the list closes on the next
    /// [`poll`](Self::poll), on the controller thread.
    pub fn connect_outside_source(&mut self, source: &dyn OutsideInteractionSource) {
        let flag = self.outside_clicked.clone();
        let subscription = source.subscribe(Box::new(move || {
            flag.store(true, Ordering::SeqCst);
        }));
        self.outside_subscription = Some(subscription);
    }

    // =========================================================================
    // Controlled Mode
    // =========================================================================

    /// Set or drop the externally committed value.
    ///
    /// A non-empty value enters committed mode: the input is disabled and
    /// every operation except [`clear_external_selection`] is suppressed.
    /// `None` (or an empty value) returns to free typing with the committed
    /// value as the editable query, and completes a pending clear by
    /// requesting focus back.
    pub fn set_external_value(&mut self, value: Option<String>) {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => {
                self.coordinator.reset();
                self.selection.close_and_reset();
                self.mode = InputMode::Committed { value };
            }
            None => {
                if let InputMode::Committed { value } = &self.mode {
                    self.mode = InputMode::FreeTyping {
                        query: value.clone(),
                    };
                    if self.pending_focus_restore {
                        self.pending_focus_restore = false;
                        self.focused = true;
                        self.focus_requested.emit(());
                    }
                }
            }
        }
    }

    /// Clear the external selection (the "x" affordance).
    ///
    /// Only valid while an external selection is present; emits
    /// `selected("")` so the external caller drops its value, after which
    /// [`set_external_value`]`(None)` restores free typing and focus.
    pub fn clear_external_selection(&mut self) {
        if !self.is_disabled() {
            tracing::trace!(
                target: "typeahead::search_box",
                "clear ignored: no external selection present"
            );
            return;
        }
        self.pending_focus_restore = true;
        self.selected.emit(String::new());
    }

    // =========================================================================
    // Driving
    // =========================================================================

    /// Pump the widget: consume outside clicks, fire due debounces, apply
    /// completed fetches. Returns `true` when observable state changed.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// [`poll`](Self::poll) with an explicit clock, for deterministic
    /// driving.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if self.outside_clicked.swap(false, Ordering::SeqCst) {
            self.handle_outside_interaction();
            changed = true;
        }

        for event in self.coordinator.poll(now) {
            changed = true;
            match event {
                CoordinatorEvent::FetchStarted => {
                    if self.focused {
                        self.selection.open();
                    }
                }
                CoordinatorEvent::Resolved { .. } => {
                    self.selection.on_items_changed();
                    if self.focused {
                        self.selection.open();
                    }
                }
                CoordinatorEvent::Failed => {
                    self.selection.on_items_changed();
                }
            }
        }

        changed
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn meets_gate(&self) -> bool {
        match &self.mode {
            InputMode::FreeTyping { query } => {
                query.chars().count() >= self.coordinator.min_chars()
            }
            InputMode::Committed { .. } => false,
        }
    }

    /// Commit `value`: it becomes the query, the list resets, focus is
    /// released, and the selection event fires.
    fn commit(&mut self, value: String) {
        tracing::trace!(target: "typeahead::search_box", value = %value, "suggestion committed");
        self.mode = InputMode::FreeTyping {
            query: value.clone(),
        };
        self.coordinator.reset();
        self.selection.close_and_reset();
        self.focused = false;
        self.selected.emit(value);
    }

    fn emit_highlighted_if_moved(&self, before: i32) {
        let index = self.selection.active_index();
        if index != before && index >= 0 {
            if let Some(suggestion) = self.coordinator.items().get(index as usize) {
                self.highlighted.emit(suggestion.value.clone());
            }
        }
    }
}

impl std::fmt::Debug for SearchBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchBox")
            .field("mode", &self.mode)
            .field("focused", &self.focused)
            .field("is_open", &self.selection.is_open())
            .field("active_index", &self.selection.active_index())
            .field("items", &self.coordinator.items().len())
            .finish()
    }
}
