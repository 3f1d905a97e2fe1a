use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use panscroll_protocol::{EventSource, HostCommand, Measurements, TimerToken, Viewport};

/// Simulated CSS pixels per terminal column.
pub const PX_PER_COL: f64 = 10.0;
/// Simulated CSS pixels per terminal row.
pub const PX_PER_ROW: f64 = 20.0;

/// Share of the remaining distance a smooth scroll covers each frame.
const SCROLL_EASE: f64 = 0.35;

/// A pretend browser page: one document, one window, a section strip.
///
/// Applies [`HostCommand`]s the way the JavaScript glue does in a real page.
/// Layout is trivial: every section is exactly one viewport in size, placed
/// side by side when the viewport is at least `breakpoint_px` wide and
/// stacked otherwise.
#[derive(Debug)]
pub struct SimPage {
    section_count: usize,
    breakpoint_px: f64,
    pub viewport: Viewport,
    pub scroll_y: f64,
    scroll_target: Option<f64>,
    scroll_dirty: bool,
    document_height: Option<f64>,
    pub strip_x: f64,
    pub scroll_locked: bool,
    pub menu_open: bool,
    pub active: usize,
    listening: BTreeSet<EventSource>,
    timers: BTreeMap<TimerToken, Instant>,
}

pub fn viewport_for(cols: u16, rows: u16) -> Viewport {
    Viewport::new(
        f64::from(cols) * PX_PER_COL,
        f64::from(rows) * PX_PER_ROW,
    )
}

impl SimPage {
    pub fn new(section_count: usize, breakpoint_px: f64, cols: u16, rows: u16) -> Self {
        Self {
            section_count,
            breakpoint_px,
            viewport: viewport_for(cols, rows),
            scroll_y: 0.0,
            scroll_target: None,
            scroll_dirty: false,
            document_height: None,
            strip_x: 0.0,
            scroll_locked: false,
            menu_open: false,
            active: 0,
            listening: BTreeSet::new(),
            timers: BTreeMap::new(),
        }
    }

    /// The same media query the page stylesheet would use.
    pub fn is_wide(&self) -> bool {
        self.viewport.width >= self.breakpoint_px
    }

    fn natural_height(&self) -> f64 {
        if self.is_wide() {
            self.viewport.height
        } else {
            self.viewport.height * self.section_count as f64
        }
    }

    pub fn document_height(&self) -> f64 {
        self.document_height.unwrap_or_else(|| self.natural_height())
    }

    pub fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport.height).max(0.0)
    }

    pub fn is_listening(&self, source: EventSource) -> bool {
        self.listening.contains(&source)
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.viewport = viewport_for(cols, rows);
        self.clamp_scroll();
    }

    /// Layout snapshot as the page would report it without any override.
    pub fn measure(&self) -> Measurements {
        let n = self.section_count;
        let Viewport { width, height } = self.viewport;
        let section_tops = if self.is_wide() {
            vec![Some(0.0); n]
        } else {
            (0..n).map(|i| Some(height * i as f64)).collect()
        };
        Measurements {
            viewport: self.viewport,
            document_height: self.natural_height(),
            section_extents: vec![Some(width); n],
            section_tops,
            pending_images: 0,
        }
    }

    pub fn apply(&mut self, commands: Vec<HostCommand>, now: Instant) {
        for command in commands {
            match command {
                HostCommand::Listen { source } => {
                    self.listening.insert(source);
                }
                HostCommand::Unlisten { source } => {
                    self.listening.remove(&source);
                }
                HostCommand::SmoothScrollTo { top } => {
                    if !self.scroll_locked {
                        self.scroll_target = Some(top);
                    }
                }
                HostCommand::SetDocumentHeight { height } => {
                    self.document_height = Some(height);
                    self.clamp_scroll();
                }
                HostCommand::ResetDocumentHeight => {
                    self.document_height = None;
                    self.clamp_scroll();
                }
                HostCommand::SetStripOffset { x } => self.strip_x = x,
                HostCommand::ArmTimer { token, delay_ms } => {
                    let deadline = now + Duration::from_millis(u64::from(delay_ms));
                    self.timers.insert(token, deadline);
                }
                HostCommand::ClearTimer { token } => {
                    self.timers.remove(&token);
                }
                HostCommand::SetScrollLock { locked } => {
                    self.scroll_locked = locked;
                    if locked {
                        self.scroll_target = None;
                    }
                }
                HostCommand::SetMenuOpen { open } => self.menu_open = open,
                HostCommand::ActiveSectionChanged { index } => self.active = index,
            }
        }
    }

    /// Scroll by the visitor. Cancels any smooth scroll in flight.
    pub fn scroll_by(&mut self, delta: f64) {
        if self.scroll_locked {
            return;
        }
        self.scroll_target = None;
        self.set_scroll(self.scroll_y + delta);
    }

    /// Advance a smooth scroll by one frame.
    pub fn step_scroll(&mut self) {
        let Some(target) = self.scroll_target else {
            return;
        };
        let target = target.clamp(0.0, self.max_scroll());
        let remaining = target - self.scroll_y;
        if remaining.abs() < 1.0 {
            self.scroll_target = None;
            self.set_scroll(target);
        } else {
            self.set_scroll(self.scroll_y + remaining * SCROLL_EASE);
        }
    }

    pub fn is_animating(&self) -> bool {
        self.scroll_target.is_some()
    }

    /// True once per scroll position change while a scroll listener is
    /// registered, like the browser's `scroll` event.
    pub fn take_scroll_event(&mut self) -> bool {
        let dirty = std::mem::take(&mut self.scroll_dirty);
        dirty && self.is_listening(EventSource::Scroll)
    }

    /// Remove and return every timer whose deadline has passed.
    pub fn due_timers(&mut self, now: Instant) -> Vec<TimerToken> {
        let due: Vec<TimerToken> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(token, _)| *token)
            .collect();
        for token in &due {
            self.timers.remove(token);
        }
        due
    }

    #[cfg(test)]
    pub fn armed_timers(&self) -> usize {
        self.timers.len()
    }

    fn clamp_scroll(&mut self) {
        self.set_scroll(self.scroll_y);
    }

    fn set_scroll(&mut self, y: f64) {
        let y = y.clamp(0.0, self.max_scroll());
        if (y - self.scroll_y).abs() > f64::EPSILON {
            self.scroll_y = y;
            self.scroll_dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_terminal_lays_sections_side_by_side() {
        // 120 cols × 10 px = 1200 px wide.
        let page = SimPage::new(3, 1024.0, 120, 40);
        assert!(page.is_wide());
        let m = page.measure();
        assert!((m.document_height - 800.0).abs() < f64::EPSILON);
        assert_eq!(m.section_extents, vec![Some(1200.0); 3]);
        assert_eq!(m.section_tops, vec![Some(0.0); 3]);
    }

    #[test]
    fn narrow_terminal_stacks_sections() {
        let page = SimPage::new(3, 1024.0, 80, 30);
        assert!(!page.is_wide());
        let m = page.measure();
        assert!((m.document_height - 1800.0).abs() < f64::EPSILON);
        assert_eq!(m.section_tops, vec![Some(0.0), Some(600.0), Some(1200.0)]);
        assert!((page.max_scroll() - 1200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn document_height_override_extends_scroll_range() {
        let mut page = SimPage::new(3, 1024.0, 120, 40);
        let now = Instant::now();
        assert!(page.max_scroll().abs() < f64::EPSILON);
        page.apply(vec![HostCommand::SetDocumentHeight { height: 3200.0 }], now);
        assert!((page.max_scroll() - 2400.0).abs() < f64::EPSILON);

        page.scroll_by(2000.0);
        page.apply(vec![HostCommand::ResetDocumentHeight], now);
        assert!(page.scroll_y.abs() < f64::EPSILON);
    }

    #[test]
    fn smooth_scroll_eases_to_target() {
        let mut page = SimPage::new(3, 1024.0, 80, 30);
        page.apply(
            vec![
                HostCommand::Listen {
                    source: EventSource::Scroll,
                },
                HostCommand::SmoothScrollTo { top: 600.0 },
            ],
            Instant::now(),
        );
        page.step_scroll();
        assert!(page.scroll_y > 0.0 && page.scroll_y < 600.0);
        assert!(page.take_scroll_event());
        assert!(!page.take_scroll_event());

        for _ in 0..100 {
            page.step_scroll();
        }
        assert!(!page.is_animating());
        assert!((page.scroll_y - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn scroll_events_need_a_listener() {
        let mut page = SimPage::new(3, 1024.0, 80, 30);
        page.scroll_by(100.0);
        assert!(!page.take_scroll_event());
    }

    #[test]
    fn scroll_lock_blocks_visitor_and_programmatic_scroll() {
        let mut page = SimPage::new(3, 1024.0, 80, 30);
        let now = Instant::now();
        page.apply(
            vec![
                HostCommand::SetScrollLock { locked: true },
                HostCommand::SmoothScrollTo { top: 600.0 },
            ],
            now,
        );
        page.scroll_by(100.0);
        page.step_scroll();
        assert!(page.scroll_y.abs() < f64::EPSILON);
        assert!(!page.is_animating());
    }

    #[test]
    fn timers_fire_after_their_delay() {
        let mut page = SimPage::new(3, 1024.0, 80, 30);
        let start = Instant::now();
        page.apply(
            vec![
                HostCommand::ArmTimer {
                    token: TimerToken(1),
                    delay_ms: 3000,
                },
                HostCommand::ArmTimer {
                    token: TimerToken(2),
                    delay_ms: 5000,
                },
                HostCommand::ClearTimer {
                    token: TimerToken(2),
                },
            ],
            start,
        );
        assert!(page.due_timers(start + Duration::from_millis(2999)).is_empty());
        assert_eq!(
            page.due_timers(start + Duration::from_millis(3000)),
            vec![TimerToken(1)]
        );
        assert_eq!(page.armed_timers(), 0);
    }
}
