//! Observer trait for session lifecycle events.
//!
//! Inject an [`Arc<dyn SessionObserver>`] via [`crate::app::App::with_observer`]
//! to hear about parses and questions as they start and finish. The
//! terminal front end drives its spinner from these events; a server could
//! forward them to a log or a WebSocket instead.
//!
//! Events for completions that arrived too late (a newer document or a reset
//! superseded them) are reported through [`SessionObserver::on_stale`] and
//! never through the regular `on_*` hooks.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdfqa::SessionObserver;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct PageCounter {
//!     pages: AtomicUsize,
//! }
//!
//! impl SessionObserver for PageCounter {
//!     fn on_parse_complete(&self, page_count: usize) {
//!         self.pages.store(page_count, Ordering::SeqCst);
//!     }
//! }
//! ```

use crate::session::OperationKind;
use std::sync::Arc;

/// Called by the application controller as operations start and finish.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events may arrive from any tokio worker thread.
pub trait SessionObserver: Send + Sync {
    /// A PDF was accepted and parsing began.
    fn on_parse_start(&self, name: &str) {
        let _ = name;
    }

    /// Parsing finished and the content is now current.
    fn on_parse_complete(&self, page_count: usize) {
        let _ = page_count;
    }

    /// Parsing failed; `error` is the message the user sees.
    fn on_parse_error(&self, error: &str) {
        let _ = error;
    }

    /// A question was accepted and sent to the answerer.
    fn on_ask_start(&self, question: &str) {
        let _ = question;
    }

    /// An answer arrived. `answer_len` is the byte length of the raw text.
    fn on_answer(&self, answer_len: usize) {
        let _ = answer_len;
    }

    /// The question failed; `error` is the message the user sees.
    fn on_ask_error(&self, error: &str) {
        let _ = error;
    }

    /// A completion of `kind` was discarded because it was superseded.
    fn on_stale(&self, kind: OperationKind) {
        let _ = kind;
    }
}

/// An observer that ignores every event. Default for [`crate::app::App`].
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Shared observer handle as stored by [`crate::app::App`].
pub type SharedObserver = Arc<dyn SessionObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingObserver {
        parse_starts: AtomicUsize,
        pages: AtomicUsize,
        asks: AtomicUsize,
        errors: AtomicUsize,
        stale: AtomicUsize,
    }

    impl SessionObserver for TrackingObserver {
        fn on_parse_start(&self, _name: &str) {
            self.parse_starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_parse_complete(&self, page_count: usize) {
            self.pages.store(page_count, Ordering::SeqCst);
        }

        fn on_ask_start(&self, _question: &str) {
            self.asks.fetch_add(1, Ordering::SeqCst);
        }

        fn on_ask_error(&self, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_stale(&self, _kind: OperationKind) {
            self.stale.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let obs = NoopObserver;
        obs.on_parse_start("a.pdf");
        obs.on_parse_complete(3);
        obs.on_parse_error("bad");
        obs.on_ask_start("q");
        obs.on_answer(10);
        obs.on_ask_error("boom");
        obs.on_stale(OperationKind::Parse);
    }

    #[test]
    fn tracking_observer_receives_events() {
        let tracker = TrackingObserver::default();

        tracker.on_parse_start("a.pdf");
        tracker.on_parse_complete(12);
        tracker.on_ask_start("q1");
        tracker.on_ask_error("timeout");
        tracker.on_ask_start("q2");
        tracker.on_stale(OperationKind::Ask);

        assert_eq!(tracker.parse_starts.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.pages.load(Ordering::SeqCst), 12);
        assert_eq!(tracker.asks.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.stale.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_observer_works() {
        let obs: SharedObserver = Arc::new(NoopObserver);
        obs.on_parse_start("x.pdf");
        obs.on_answer(512);
    }
}
