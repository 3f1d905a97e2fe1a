use log::trace;
use panscroll_protocol::ScrollState;

use super::mapper::ScrollCoordinateMapper;
use crate::subscribers::{SubscriberId, Subscribers};

/// Derives the active section from scroll position and broadcasts it.
#[derive(Debug)]
pub struct ActiveSectionTracker {
    active: Option<usize>,
    state: ScrollState,
    edge_triggered: bool,
    subscribers: Subscribers<usize>,
}

impl ActiveSectionTracker {
    pub fn new(edge_triggered: bool) -> Self {
        Self {
            active: None,
            state: ScrollState::default(),
            edge_triggered,
            subscribers: Subscribers::new(),
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&usize) + 'static) -> SubscriberId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Recompute from `raw_offset`. Returns the index if it was published.
    pub fn sync(&mut self, mapper: &ScrollCoordinateMapper, raw_offset: f64) -> Option<usize> {
        self.state = mapper.scroll_state(raw_offset);
        let index = mapper.offset_to_index(raw_offset);
        let changed = self.active != Some(index);
        self.active = Some(index);
        if !changed && self.edge_triggered {
            return None;
        }
        trace!(
            "active section {index} (progress {:.3})",
            self.state.progress
        );
        self.subscribers.publish(&index);
        Some(index)
    }

    /// Last computed index, or `None` before the first sync.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_index(&self) -> usize {
        self.active.unwrap_or(0)
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.state
    }

    pub fn progress(&self) -> f64 {
        self.state.progress
    }

    /// Forget the last index so the next sync republishes.
    pub fn invalidate(&mut self) {
        self.active = None;
    }
}
