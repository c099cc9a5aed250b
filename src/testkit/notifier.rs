//! Notifier that keeps every event for later assertions.

use std::sync::{Arc, Mutex};

use crate::port::{Event, Notifier, TradeFailedEvent};

/// Clones share the same event log, so a test can keep one handle and give
/// another to the code under test.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("lock notifier events").clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("lock notifier events").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Only the failure events, in order.
    pub fn failures(&self) -> Vec<TradeFailedEvent> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::TradeFailed(failed) => Some(failed),
                Event::TradeOpened(_) => None,
            })
            .collect()
    }

    /// Number of success events.
    pub fn opened_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::TradeOpened(_)))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events.lock().expect("lock notifier events").push(event);
    }
}
