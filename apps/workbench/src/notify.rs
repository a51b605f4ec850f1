//! # Notification Center
//!
//! Transient on-screen messages with auto-dismiss.
//!
//! Rendering is out of scope here: the center owns the message list and
//! the dismiss policy, the view layer draws whatever `active()` returns.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Notification Lifecycle                               │
//! │                                                                         │
//! │  push("Pedido creado", Success) ──► active list (insertion order)      │
//! │                                          │                              │
//! │              user clicks close ──► dismiss(id)                          │
//! │                                          │                              │
//! │       render tick calls sweep(now) ──► drops non-persistent entries    │
//! │                                        older than 5 s                   │
//! │                                                                         │
//! │  Persistent entries (connection loss) survive sweep and only leave     │
//! │  through dismiss(id).                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use ts_rs::TS;

/// How long a non-persistent notification stays on screen.
const AUTO_DISMISS_SECS: i64 = 5;

/// Visual severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Danger,
    Warning,
    Info,
}

/// One on-screen message.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Session-local id, for manual dismissal.
    pub id: u64,

    pub message: String,

    pub severity: Severity,

    /// Persistent notifications survive the auto-dismiss sweep.
    pub persistent: bool,

    /// When the notification was pushed.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// The notification list and its dismiss policy.
#[derive(Debug)]
pub struct NotificationCenter {
    next_id: u64,
    ttl: Duration,
    active: Vec<Notification>,
}

impl NotificationCenter {
    /// Creates an empty center with the standard 5 second auto-dismiss.
    pub fn new() -> Self {
        NotificationCenter {
            next_id: 0,
            ttl: Duration::seconds(AUTO_DISMISS_SECS),
            active: Vec::new(),
        }
    }

    /// Pushes a message; returns its id.
    pub fn push(
        &mut self,
        severity: Severity,
        message: impl Into<String>,
        persistent: bool,
    ) -> u64 {
        self.next_id += 1;
        self.active.push(Notification {
            id: self.next_id,
            message: message.into(),
            severity,
            persistent,
            created_at: Utc::now(),
        });
        self.next_id
    }

    /// Removes a notification by id. Returns whether it was present.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.active.len();
        self.active.retain(|n| n.id != id);
        self.active.len() != before
    }

    /// Drops non-persistent notifications older than the TTL.
    ///
    /// `now` is passed in so the policy is testable without waiting;
    /// the render loop passes `Utc::now()`.
    ///
    /// ## Returns
    /// How many notifications were dropped.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl;
        let before = self.active.len();
        self.active
            .retain(|n| n.persistent || now - n.created_at < ttl);
        before - self.active.len()
    }

    /// The notifications currently on screen, oldest first.
    pub fn active(&self) -> &[Notification] {
        &self.active
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Shared Handle
// =============================================================================

/// Cloneable handle to the shared notification center.
///
/// ## Thread Safety
/// Wrapped in `Arc<Mutex<T>>` because every controller pushes into the
/// same list while the render loop reads it. Operations are short; a
/// plain Mutex is enough.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    center: Arc<Mutex<NotificationCenter>>,
}

impl Notifier {
    /// Creates a handle to a fresh center.
    pub fn new() -> Self {
        Notifier::default()
    }

    /// Pushes a transient notification.
    pub fn push(&self, severity: Severity, message: impl Into<String>) -> u64 {
        self.with_center_mut(|c| c.push(severity, message, false))
    }

    /// Pushes a persistent notification (survives auto-dismiss).
    pub fn push_persistent(&self, severity: Severity, message: impl Into<String>) -> u64 {
        self.with_center_mut(|c| c.push(severity, message, true))
    }

    /// Removes a notification by id.
    pub fn dismiss(&self, id: u64) -> bool {
        self.with_center_mut(|c| c.dismiss(id))
    }

    /// Runs the auto-dismiss sweep against the current time.
    pub fn sweep(&self) -> usize {
        self.with_center_mut(|c| c.sweep(Utc::now()))
    }

    /// Snapshot of the active notifications for rendering.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.with_center(|c| c.active().to_vec())
    }

    /// Executes a function with read access to the center.
    pub fn with_center<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&NotificationCenter) -> R,
    {
        let center = self.center.lock().expect("Notification mutex poisoned");
        f(&center)
    }

    /// Executes a function with write access to the center.
    pub fn with_center_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut NotificationCenter) -> R,
    {
        let mut center = self.center.lock().expect("Notification mutex poisoned");
        f(&mut center)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_order() {
        let mut center = NotificationCenter::new();
        center.push(Severity::Success, "primero", false);
        center.push(Severity::Info, "segundo", false);

        let active = center.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].message, "primero");
        assert_eq!(active[1].message, "segundo");
        assert!(active[0].id < active[1].id);
    }

    #[test]
    fn test_sweep_drops_expired_transients() {
        let mut center = NotificationCenter::new();
        center.push(Severity::Success, "transient", false);

        // Not yet expired
        assert_eq!(center.sweep(Utc::now()), 0);
        assert_eq!(center.active().len(), 1);

        // Past the TTL
        let later = Utc::now() + Duration::seconds(AUTO_DISMISS_SECS + 1);
        assert_eq!(center.sweep(later), 1);
        assert!(center.active().is_empty());
    }

    #[test]
    fn test_persistent_survives_sweep() {
        let mut center = NotificationCenter::new();
        let id = center.push(Severity::Danger, "sin conexión", true);

        let later = Utc::now() + Duration::seconds(60);
        assert_eq!(center.sweep(later), 0);
        assert_eq!(center.active().len(), 1);

        // Manual dismiss is the only way out
        assert!(center.dismiss(id));
        assert!(center.active().is_empty());
    }

    #[test]
    fn test_dismiss_unknown_id() {
        let mut center = NotificationCenter::new();
        assert!(!center.dismiss(99));
    }

    #[test]
    fn test_notifier_is_shared() {
        let notifier = Notifier::new();
        let clone = notifier.clone();

        notifier.push(Severity::Info, "compartida");
        assert_eq!(clone.snapshot().len(), 1);
        assert_eq!(clone.snapshot()[0].message, "compartida");
    }
}
