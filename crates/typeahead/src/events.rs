//! Input events and injected event capabilities.
//!
//! The controller does not listen to any windowing system itself. The
//! embedding renderer translates its native key and pointer events into the
//! small vocabulary here and feeds them to the widget; outside-pointer
//! detection is likewise injected as a subscribe/release capability so the
//! controller stays decoupled from any event-delivery mechanism.

// ============================================================================
// Keys
// ============================================================================

/// The keys the selection controller consumes.
///
/// Everything else (printable input, editing keys) belongs to the embedding
/// text field, which reports the resulting text via `set_query`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move the active suggestion up.
    ArrowUp,
    /// Move the active suggestion down.
    ArrowDown,
    /// Commit the active suggestion.
    Enter,
    /// Close the suggestion list.
    Escape,
}

// ============================================================================
// Outside Interaction
// ============================================================================

/// A held outside-interaction subscription; releases itself when dropped.
pub struct OutsideSubscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl OutsideSubscription {
    /// Wrap a release action to run exactly once, on drop or `release()`.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Release the subscription now.
    pub fn release(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for OutsideSubscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for OutsideSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutsideSubscription")
            .field("held", &self.release.is_some())
            .finish()
    }
}

/// The injected outside-pointer-interaction capability.
///
/// The widget acquires a subscription on activation and holds it until
/// teardown; the source invokes `handler` whenever a pointer interaction
/// lands outside the widget's visual bounds.
pub trait OutsideInteractionSource {
    /// Register `handler`; the returned subscription unregisters it.
    fn subscribe(&self, handler: Box<dyn Fn() + Send + Sync>) -> OutsideSubscription;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn subscription_releases_once_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));
        let released_clone = released.clone();
        {
            let _sub = OutsideSubscription::new(move || {
                released_clone.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_release_consumes_the_action() {
        let released = Arc::new(AtomicUsize::new(0));
        let released_clone = released.clone();
        let sub = OutsideSubscription::new(move || {
            released_clone.fetch_add(1, Ordering::SeqCst);
        });
        sub.release();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
