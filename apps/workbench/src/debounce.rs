//! # Debounced Search
//!
//! Search-as-you-type is modeled as two separable pieces:
//!
//! 1. [`SearchPolicy`] - the pure decision: given the raw input, either
//!    clear the results (query too short) or schedule a search with the
//!    trimmed query after the quiet period. Testable without timers.
//! 2. [`Debouncer`] - the single owned timer slot: scheduling a new task
//!    aborts the previous pending one, so at most one search per input
//!    stream settles after the user stops typing.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Keystroke Handling                                  │
//! │                                                                         │
//! │  keystroke "ib"     ──► policy: Schedule("ib")   ──► timer armed        │
//! │  keystroke "ibu"    ──► policy: Schedule("ibu")  ──► previous ABORTED,  │
//! │                                                      timer re-armed     │
//! │  300 ms quiet       ──► task fires: ONE request for "ibu"              │
//! │                                                                         │
//! │  keystroke "i"      ──► policy: Clear ──► timer aborted, results hidden │
//! │                                          (no request is issued)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

use farmalink_core::validation::validate_search_query;

/// Minimum characters before a search fires.
pub const MIN_QUERY_CHARS: usize = 2;

/// Quiet period after the last keystroke.
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);

// =============================================================================
// Search Policy
// =============================================================================

/// What to do with the current input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchDirective {
    /// Hide/clear the result list and cancel any pending timer.
    /// No request is issued for sub-threshold queries.
    Clear,
    /// Arm the timer; fire a search with this trimmed query if no
    /// further keystroke arrives within the quiet period.
    Schedule(String),
}

/// The pure scheduling decision for one search input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    pub min_chars: usize,
    pub quiet_period: Duration,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        SearchPolicy {
            min_chars: MIN_QUERY_CHARS,
            quiet_period: QUIET_PERIOD,
        }
    }
}

impl SearchPolicy {
    /// Decides what a keystroke means for the result list.
    ///
    /// Over-long input (someone pasting a document into the box) is
    /// treated like a sub-threshold query: results clear, nothing fires.
    pub fn evaluate(&self, raw: &str) -> SearchDirective {
        let Ok(query) = validate_search_query(raw) else {
            return SearchDirective::Clear;
        };
        if query.chars().count() < self.min_chars {
            SearchDirective::Clear
        } else {
            SearchDirective::Schedule(query)
        }
    }
}

// =============================================================================
// Debouncer
// =============================================================================

/// A single-slot debounce timer.
///
/// Owns at most one pending task; scheduling implicitly cancels the
/// previous one. Dropping the debouncer (navigating away) aborts any
/// pending task without side effects.
#[derive(Debug, Default)]
pub struct Debouncer {
    slot: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Debouncer::default()
    }

    /// Arms the timer: after `quiet_period`, run `task`.
    ///
    /// Any previously armed timer is aborted first - only the last
    /// keystroke within the quiet period produces a request.
    pub fn schedule<F, Fut>(&mut self, quiet_period: Duration, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        self.cancel();
        self.slot = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            task().await;
        }));
    }

    /// Aborts the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.slot.take() {
            handle.abort();
        }
    }

    /// Whether a timer is currently armed and not yet fired.
    pub fn is_pending(&self) -> bool {
        self.slot.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
