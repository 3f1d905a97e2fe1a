use log::debug;
use panscroll_protocol::ViewportMode;

use crate::subscribers::{SubscriberId, Subscribers};

/// A mode transition observed on resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub from: ViewportMode,
    pub to: ViewportMode,
}

/// Classify a viewport width. No hysteresis: `width < breakpoint` stacks.
pub fn classify(width: f64, breakpoint: f64) -> ViewportMode {
    if width < breakpoint {
        ViewportMode::Stacked
    } else {
        ViewportMode::Panned
    }
}

/// Tracks the current [`ViewportMode`] and notifies on transitions.
#[derive(Debug)]
pub struct ViewportModeDetector {
    breakpoint: f64,
    current: ViewportMode,
    subscribers: Subscribers<ModeChange>,
}

impl ViewportModeDetector {
    pub fn new(breakpoint: f64, initial_width: f64) -> Self {
        Self {
            breakpoint,
            current: classify(initial_width, breakpoint),
            subscribers: Subscribers::new(),
        }
    }

    pub fn current_mode(&self) -> ViewportMode {
        self.current
    }

    pub fn on_change(&mut self, callback: impl FnMut(&ModeChange) + 'static) -> SubscriberId {
        self.subscribers.subscribe(callback)
    }

    pub fn remove_listener(&mut self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Re-evaluate after a resize. Resizes within the same mode are
    /// absorbed and return `None`.
    pub fn update(&mut self, width: f64) -> Option<ModeChange> {
        let next = classify(width, self.breakpoint);
        if next == self.current {
            return None;
        }
        let change = ModeChange {
            from: self.current,
            to: next,
        };
        debug!("viewport mode {} -> {} at width {width}", change.from, change.to);
        self.current = next;
        self.subscribers.publish(&change);
        Some(change)
    }
}
