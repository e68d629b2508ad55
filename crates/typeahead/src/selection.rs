//! Keyboard/pointer navigation over the suggestion list.
//!
//! [`SelectionController`] tracks which row is active and whether the list
//! is open, and turns navigation events into state transitions. It never
//! owns the items themselves — operations take the current item count — and
//! it never commits: the composition root asks for the commit target and
//! performs the selection event itself.

// ============================================================================
// Selection Controller
// ============================================================================

/// Active-row and visibility state machine.
///
/// `active_index` is `-1` while no row is active. Navigation clamps at both
/// ends: ArrowDown stops on the last row, ArrowUp stops on the first — the
/// list never wraps.
#[derive(Debug)]
pub struct SelectionController {
    /// Whether the suggestion list is visible.
    is_open: bool,
    /// Currently active row (-1 means none).
    active_index: i32,
    /// First visible row when the list exceeds `max_visible_items`.
    scroll_offset: usize,
    /// Maximum number of rows shown at once.
    max_visible_items: usize,
}

impl SelectionController {
    /// Create a closed controller with no active row.
    pub fn new(max_visible_items: usize) -> Self {
        Self {
            is_open: false,
            active_index: -1,
            scroll_offset: 0,
            max_visible_items: max_visible_items.max(1),
        }
    }

    /// Whether the list is visible.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// The active row, `-1` when none.
    pub fn active_index(&self) -> i32 {
        self.active_index
    }

    /// First visible row.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Maximum number of rows shown at once.
    pub fn max_visible_items(&self) -> usize {
        self.max_visible_items
    }

    /// Change the viewport height (at least one row).
    pub fn set_max_visible_items(&mut self, count: usize) {
        self.max_visible_items = count.max(1);
    }

    /// The range of rows the renderer should draw for `count` items.
    pub fn visible_range(&self, count: usize) -> std::ops::Range<usize> {
        let start = self.scroll_offset.min(count);
        let end = (start + self.max_visible_items).min(count);
        start..end
    }

    /// React to a query edit.
    ///
    /// Below the gate the list closes and the active row resets; at or above
    /// it the list opens as soon as there is anything to show (items or a
    /// fetch in flight).
    pub fn on_query_changed(&mut self, meets_gate: bool, has_candidates: bool) {
        if !meets_gate {
            self.close_and_reset();
        } else if has_candidates {
            self.is_open = true;
        }
    }

    /// React to the item list being replaced: no row is active and the
    /// viewport rewinds. Visibility is decided by the caller.
    pub fn on_items_changed(&mut self) {
        self.active_index = -1;
        self.scroll_offset = 0;
    }

    /// Open the list.
    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Close the list. The active row keeps its value but is irrelevant
    /// while closed.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Close and forget the active row (Escape, gate underflow, commit).
    pub fn close_and_reset(&mut self) {
        self.is_open = false;
        self.active_index = -1;
        self.scroll_offset = 0;
    }

    /// Move the active row down, clamped to the last row. No-op while
    /// closed or empty.
    pub fn move_down(&mut self, count: usize) {
        if !self.is_open || count == 0 {
            return;
        }
        self.active_index = (self.active_index + 1).min(count as i32 - 1);
        self.ensure_active_visible();
    }

    /// Move the active row up, clamped to the first row. No-op while closed.
    pub fn move_up(&mut self) {
        if !self.is_open {
            return;
        }
        self.active_index = (self.active_index - 1).max(0);
        self.ensure_active_visible();
    }

    /// Make `index` the active row without opening or closing the list.
    pub fn hover(&mut self, index: usize) {
        self.active_index = index as i32;
    }

    /// The row a commit would select, if any.
    pub fn commit_target(&self, count: usize) -> Option<usize> {
        if !self.is_open {
            return None;
        }
        (self.active_index >= 0 && (self.active_index as usize) < count)
            .then_some(self.active_index as usize)
    }

    /// Scroll just enough to keep the active row inside the viewport.
    ///
    /// Runs against the freshly updated index, inside the same operation
    /// that moved it, so the scroll target is never one step behind.
    fn ensure_active_visible(&mut self) {
        if self.active_index < 0 {
            return;
        }
        let index = self.active_index as usize;
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if index >= self.scroll_offset + self.max_visible_items {
            self.scroll_offset = index - self.max_visible_items + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_controller() -> SelectionController {
        let mut selection = SelectionController::new(7);
        selection.open();
        selection
    }

    #[test]
    fn arrow_down_clamps_at_last_row() {
        let mut selection = open_controller();
        selection.move_down(3);
        selection.move_down(3);
        selection.move_down(3);
        assert_eq!(selection.active_index(), 2);
        selection.move_down(3);
        assert_eq!(selection.active_index(), 2);
    }

    #[test]
    fn arrow_up_clamps_at_first_row() {
        let mut selection = open_controller();
        selection.move_down(3);
        assert_eq!(selection.active_index(), 0);
        selection.move_up();
        assert_eq!(selection.active_index(), 0);
    }

    #[test]
    fn navigation_is_inert_while_closed() {
        let mut selection = SelectionController::new(7);
        selection.move_down(3);
        selection.move_up();
        assert_eq!(selection.active_index(), -1);
        assert!(!selection.is_open());
    }

    #[test]
    fn first_arrow_down_activates_first_row() {
        let mut selection = open_controller();
        assert_eq!(selection.active_index(), -1);
        selection.move_down(5);
        assert_eq!(selection.active_index(), 0);
    }

    #[test]
    fn gate_underflow_closes_and_resets() {
        let mut selection = open_controller();
        selection.move_down(3);
        selection.on_query_changed(false, true);
        assert!(!selection.is_open());
        assert_eq!(selection.active_index(), -1);
    }

    #[test]
    fn gate_met_opens_only_with_candidates() {
        let mut selection = SelectionController::new(7);
        selection.on_query_changed(true, false);
        assert!(!selection.is_open());
        selection.on_query_changed(true, true);
        assert!(selection.is_open());
    }

    #[test]
    fn close_keeps_active_index() {
        let mut selection = open_controller();
        selection.move_down(3);
        selection.close();
        assert_eq!(selection.active_index(), 0);
        assert!(selection.commit_target(3).is_none());
    }

    #[test]
    fn hover_sets_active_without_opening() {
        let mut selection = SelectionController::new(7);
        selection.hover(2);
        assert_eq!(selection.active_index(), 2);
        assert!(!selection.is_open());
    }

    #[test]
    fn commit_target_requires_valid_active_row() {
        let mut selection = open_controller();
        assert_eq!(selection.commit_target(3), None);
        selection.move_down(3);
        assert_eq!(selection.commit_target(3), Some(0));
        assert_eq!(selection.commit_target(0), None);
    }

    #[test]
    fn items_change_resets_row_and_viewport() {
        let mut selection = open_controller();
        for _ in 0..9 {
            selection.move_down(10);
        }
        assert!(selection.scroll_offset() > 0);
        selection.on_items_changed();
        assert_eq!(selection.active_index(), -1);
        assert_eq!(selection.scroll_offset(), 0);
        assert!(selection.is_open());
    }

    #[test]
    fn viewport_follows_active_row() {
        let mut selection = SelectionController::new(3);
        selection.open();
        for _ in 0..5 {
            selection.move_down(10);
        }
        // Rows 2..5 are visible; the active row is the last visible one.
        assert_eq!(selection.active_index(), 4);
        assert_eq!(selection.scroll_offset(), 2);
        assert_eq!(selection.visible_range(10), 2..5);

        for _ in 0..4 {
            selection.move_up();
        }
        assert_eq!(selection.active_index(), 0);
        assert_eq!(selection.scroll_offset(), 0);
    }

    #[test]
    fn visible_range_clamps_to_count() {
        let selection = SelectionController::new(7);
        assert_eq!(selection.visible_range(3), 0..3);
        assert_eq!(selection.visible_range(0), 0..0);
    }
}
