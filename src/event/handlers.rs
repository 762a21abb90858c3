use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::event::{EditorEvent, EventHandler};

/// Raised whenever the canvas pixels change so the UI knows to re-upload its texture.
#[derive(Debug, Clone, Default)]
pub struct RepaintFlag {
    dirty: Arc<AtomicBool>,
}

impl RepaintFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a repaint happened since the last call, and resets the flag.
    pub fn take(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}

impl EventHandler for RepaintFlag {
    fn handle_event(&mut self, event: &EditorEvent) {
        if matches!(event, EditorEvent::CanvasRedrawn) {
            self.dirty.store(true, Ordering::Release);
        }
    }
}

/// Bounded, shared record of the most recent events.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: Arc<Mutex<VecDeque<EditorEvent>>>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.lock().iter().cloned().collect()
    }

    pub fn last(&self) -> Option<EditorEvent> {
        self.events.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventHandler for EventLog {
    fn handle_event(&mut self, event: &EditorEvent) {
        let mut events = self.events.lock();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventBus;

    #[test]
    fn test_repaint_flag_only_tracks_redraws() {
        let bus = EventBus::new();
        let flag = RepaintFlag::new();
        bus.subscribe(Box::new(flag.clone()));

        bus.emit(EditorEvent::StrokeStarted);
        assert!(!flag.take());

        bus.emit(EditorEvent::CanvasRedrawn);
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn test_event_log_is_bounded() {
        let bus = EventBus::new();
        let log = EventLog::new(2);
        bus.subscribe(Box::new(log.clone()));

        bus.emit(EditorEvent::StrokeStarted);
        bus.emit(EditorEvent::StrokeDiscarded);
        bus.emit(EditorEvent::CanvasRedrawn);

        assert_eq!(log.events(), vec![EditorEvent::StrokeDiscarded, EditorEvent::CanvasRedrawn]);
        assert_eq!(bus.handler_count(), 1);
    }
}
