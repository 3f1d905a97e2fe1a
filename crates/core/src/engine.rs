use log::debug;
use panscroll_protocol::{
    EventSource, HostCommand, Key, LayoutMetrics, Measurements, NavGeometry, ScrollState,
    SectionDescriptor, TimerToken, UnderlineGeometry, UserInput, ViewportMode,
};

use crate::listeners::ListenerRegistry;
use crate::model::{EngineConfig, SectionList};
use crate::scroll::metrics::{self, ImageGate, ImageOutcome};
use crate::scroll::{
    ActiveSectionTracker, AutoAdvanceController, AutoAdvanceState, ModeChange, NavTarget,
    NavigationCommander, PanDriver, ScrollCoordinateMapper, ViewportModeDetector,
};
use crate::subscribers::SubscriberId;
use crate::widgets::{self, HeaderLink, IndicatorInput, IndicatorView, MenuItem, NavMenu};

/// The scroll choreography engine.
///
/// A deterministic state machine driven by a host. The host pushes
/// measurements and events; every operation returns the [`HostCommand`]s
/// the host must apply, in order. All widgets read the one
/// [`ScrollCoordinateMapper`] owned here.
#[derive(Debug)]
pub struct ScrollEngine {
    config: EngineConfig,
    sections: SectionList,
    detector: ViewportModeDetector,
    measurements: Measurements,
    metrics: LayoutMetrics,
    mapper: ScrollCoordinateMapper,
    pan: PanDriver,
    images: ImageGate,
    tracker: ActiveSectionTracker,
    auto: AutoAdvanceController,
    menu: NavMenu,
    listeners: ListenerRegistry,
    raw_offset: f64,
    mounted: bool,
}

impl ScrollEngine {
    pub fn new(config: EngineConfig, sections: SectionList) -> Self {
        Self {
            detector: ViewportModeDetector::new(config.breakpoint_px, 0.0),
            tracker: ActiveSectionTracker::new(config.edge_triggered),
            auto: AutoAdvanceController::new(config.dwell_ms),
            config,
            sections,
            measurements: Measurements::default(),
            metrics: LayoutMetrics::stacked(),
            mapper: ScrollCoordinateMapper::default(),
            pan: PanDriver::new(),
            images: ImageGate::default(),
            menu: NavMenu::default(),
            listeners: ListenerRegistry::default(),
            raw_offset: 0.0,
            mounted: false,
        }
    }

    // --- Lifecycle ---

    /// Register listeners, lay out, and compute the active section once so
    /// the first paint is correct. Mounting twice just re-measures.
    pub fn mount(&mut self, measurements: Measurements, raw_offset: f64) -> Vec<HostCommand> {
        if self.mounted {
            self.raw_offset = raw_offset;
            return self.remeasure(measurements);
        }
        self.mounted = true;
        self.raw_offset = raw_offset;
        debug!(
            "mounting {} sections at width {}",
            self.sections.len(),
            measurements.viewport.width
        );

        let mut commands = vec![
            HostCommand::Listen {
                source: EventSource::Scroll,
            },
            HostCommand::Listen {
                source: EventSource::Resize,
            },
        ];
        self.detector.update(measurements.viewport.width);
        self.tracker.invalidate();
        commands.extend(self.apply_measurements(measurements));
        self.listeners.filter(commands)
    }

    /// Release every resource: timer, menu lock, pan override, listeners.
    pub fn unmount(&mut self) -> Vec<HostCommand> {
        if !self.mounted {
            return Vec::new();
        }
        self.mounted = false;
        let mut commands = self.auto.pause();
        commands.extend(self.menu.close());
        commands.extend(self.pan.release());
        let mut commands = self.listeners.filter(commands);
        commands.extend(self.listeners.drain());
        debug!("unmounted");
        commands
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // --- Host events ---

    /// Window resize. May switch mode.
    ///
    /// Leaving panned mode returns `ResetDocumentHeight`. Measurements taken
    /// before that command was applied still include the stretched height,
    /// so the host follows up with [`content_changed`](Self::content_changed)
    /// once the reset is in place.
    pub fn resize(&mut self, measurements: Measurements) -> Vec<HostCommand> {
        self.remeasure(measurements)
    }

    /// Section content changed (re-render, new images).
    pub fn content_changed(&mut self, measurements: Measurements) -> Vec<HostCommand> {
        self.remeasure(measurements)
    }

    /// A strip image fired `load` or `error`.
    pub fn image_settled(&mut self, outcome: ImageOutcome) -> Vec<HostCommand> {
        if !self.mounted || !self.images.settle(outcome) {
            return Vec::new();
        }
        debug!("all strip images settled");
        let mut commands = vec![HostCommand::Unlisten {
            source: EventSource::ImageLoad,
        }];
        commands.extend(self.relayout());
        self.listeners.filter(commands)
    }

    /// Native scroll position changed.
    pub fn scroll(&mut self, raw_offset: f64) -> Vec<HostCommand> {
        if !self.mounted {
            return Vec::new();
        }
        self.raw_offset = raw_offset;
        let mut commands: Vec<_> = self.pan.on_scroll(raw_offset).into_iter().collect();
        commands.extend(self.sync_active());
        commands
    }

    /// Wheel, touch-move or key-down from the visitor.
    pub fn user_input(&mut self, input: UserInput) -> Vec<HostCommand> {
        let mut commands = self.auto.interrupt();
        if let UserInput::KeyDown { key: Key::Escape } = input {
            commands.extend(self.menu.close());
        }
        self.listeners.filter(commands)
    }

    /// An auto-advance timer fired.
    pub fn timer_fired(&mut self, token: TimerToken) -> Vec<HostCommand> {
        let Some(index) = self.auto.due(token) else {
            debug!("ignoring stale timer {token:?}");
            return Vec::new();
        };
        let commands = match self.commander().go_to(index) {
            Some(nav) => {
                let mut commands = vec![nav.command()];
                if let Some(advance) = self.auto.on_timer(token) {
                    commands.extend(advance.commands);
                }
                commands
            }
            None => {
                debug!("auto-advance to section {index} held: layout not resolved");
                self.auto.hold(token)
            }
        };
        self.listeners.filter(commands)
    }

    // --- Navigation ---

    pub fn navigate(&mut self, target: NavTarget) -> Vec<HostCommand> {
        if !self.mounted {
            return Vec::new();
        }
        let Some(nav) = self.commander().resolve(target) else {
            return Vec::new();
        };
        let mut commands = vec![nav.command()];
        commands.extend(self.auto.retarget(nav.index));
        self.listeners.filter(commands)
    }

    pub fn go_to(&mut self, index: usize) -> Vec<HostCommand> {
        self.navigate(NavTarget::Index(index))
    }

    pub fn go_next(&mut self) -> Vec<HostCommand> {
        self.navigate(NavTarget::Next)
    }

    pub fn go_prev(&mut self) -> Vec<HostCommand> {
        self.navigate(NavTarget::Prev)
    }

    pub fn go_home(&mut self) -> Vec<HostCommand> {
        self.navigate(NavTarget::Home)
    }

    // --- Auto-advance ---

    pub fn play(&mut self) -> Vec<HostCommand> {
        if !self.mounted {
            return Vec::new();
        }
        let commands = self
            .auto
            .play(self.tracker.active_index(), self.sections.len());
        self.listeners.filter(commands)
    }

    pub fn pause(&mut self) -> Vec<HostCommand> {
        let commands = self.auto.pause();
        self.listeners.filter(commands)
    }

    /// The indicator's single play/pause button.
    pub fn toggle_play(&mut self) -> Vec<HostCommand> {
        if !self.mounted {
            return Vec::new();
        }
        let commands = self
            .auto
            .toggle(self.tracker.active_index(), self.sections.len());
        self.listeners.filter(commands)
    }

    // --- Menu overlay ---

    pub fn open_menu(&mut self) -> Vec<HostCommand> {
        let commands = self.menu.open();
        self.listeners.filter(commands)
    }

    pub fn close_menu(&mut self) -> Vec<HostCommand> {
        let commands = self.menu.close();
        self.listeners.filter(commands)
    }

    pub fn toggle_menu(&mut self) -> Vec<HostCommand> {
        let commands = self.menu.toggle();
        self.listeners.filter(commands)
    }

    /// Pick a menu entry: close the overlay (releasing the scroll lock),
    /// then navigate.
    pub fn select_menu_item(&mut self, index: usize) -> Vec<HostCommand> {
        let mut commands = self.close_menu();
        commands.extend(self.go_to(index));
        commands
    }

    // --- Subscriptions ---

    /// Receive every published active index.
    pub fn subscribe_active(&mut self, callback: impl FnMut(&usize) + 'static) -> SubscriberId {
        self.tracker.subscribe(callback)
    }

    pub fn unsubscribe_active(&mut self, id: SubscriberId) -> bool {
        self.tracker.unsubscribe(id)
    }

    pub fn on_mode_change(&mut self, callback: impl FnMut(&ModeChange) + 'static) -> SubscriberId {
        self.detector.on_change(callback)
    }

    pub fn unsubscribe_mode_change(&mut self, id: SubscriberId) -> bool {
        self.detector.remove_listener(id)
    }

    // --- Queries ---

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sections(&self) -> &SectionList {
        &self.sections
    }

    pub fn mode(&self) -> ViewportMode {
        self.detector.current_mode()
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn mapper(&self) -> &ScrollCoordinateMapper {
        &self.mapper
    }

    pub fn active_index(&self) -> usize {
        self.tracker.active_index()
    }

    pub fn active_section(&self) -> Option<&SectionDescriptor> {
        self.tracker.active().and_then(|i| self.sections.get(i))
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.tracker.scroll_state()
    }

    pub fn progress(&self) -> f64 {
        self.tracker.progress()
    }

    pub fn auto_state(&self) -> AutoAdvanceState {
        self.auto.state()
    }

    pub fn is_playing(&self) -> bool {
        self.auto.is_running()
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu.is_open()
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_active()
    }

    pub fn document_height(&self) -> Option<f64> {
        self.pan.document_height()
    }

    pub fn pending_images(&self) -> usize {
        self.images.pending()
    }

    pub fn underline(&self, nav: &NavGeometry) -> UnderlineGeometry {
        widgets::underline(self.active_index(), nav)
    }

    pub fn header_links(&self) -> Vec<HeaderLink> {
        widgets::header_links(&self.sections, self.active_index())
    }

    pub fn menu_items(&self) -> Vec<MenuItem> {
        widgets::menu_items(&self.sections)
    }

    pub fn indicator(&self) -> IndicatorView {
        let commander = self.commander();
        widgets::indicator_view(
            &self.sections,
            &IndicatorInput {
                active: self.tracker.active(),
                progress: self.tracker.progress(),
                playing: self.auto.is_running(),
                can_go_prev: commander.can_go_prev(),
                can_go_next: commander.can_go_next(),
            },
        )
    }

    // --- Internals ---

    fn commander(&self) -> NavigationCommander<'_> {
        NavigationCommander::new(&self.mapper, self.tracker.active_index())
    }

    fn remeasure(&mut self, measurements: Measurements) -> Vec<HostCommand> {
        if !self.mounted {
            self.measurements = measurements;
            return Vec::new();
        }
        let mut commands = Vec::new();
        if let Some(change) = self.detector.update(measurements.viewport.width)
            && change.to == ViewportMode::Stacked
        {
            commands.extend(self.pan.release());
        }
        commands.extend(self.apply_measurements(measurements));
        self.listeners.filter(commands)
    }

    fn apply_measurements(&mut self, measurements: Measurements) -> Vec<HostCommand> {
        let mut commands = Vec::new();
        self.images.reset(measurements.pending_images);
        let listening = self.listeners.is_listening(EventSource::ImageLoad);
        if !self.images.is_open() && !listening {
            commands.push(HostCommand::Listen {
                source: EventSource::ImageLoad,
            });
        } else if self.images.is_open() && listening {
            commands.push(HostCommand::Unlisten {
                source: EventSource::ImageLoad,
            });
        }
        self.measurements = measurements;
        commands.extend(self.relayout());
        commands
    }

    /// Rebuild metrics and the mapper for the current mode.
    fn relayout(&mut self) -> Vec<HostCommand> {
        let mut commands = Vec::new();
        let count = self.sections.len();
        let viewport = self.measurements.viewport;

        match self.detector.current_mode() {
            ViewportMode::Stacked => {
                commands.extend(self.pan.release());
                self.metrics = LayoutMetrics::stacked();
                self.mapper = ScrollCoordinateMapper::stacked(
                    count,
                    self.measurements.document_height - viewport.height,
                    self.measurements.section_tops.clone(),
                );
            }
            ViewportMode::Panned if !self.images.is_open() => {
                debug!(
                    "panned metrics deferred: {} images pending",
                    self.images.pending()
                );
                // Keep the last good pan. Without one, no target resolves.
                self.mapper = match self.pan.max_scroll() {
                    Some(max_scroll) => ScrollCoordinateMapper::panned(count, max_scroll),
                    None => ScrollCoordinateMapper::unresolved(count),
                };
            }
            ViewportMode::Panned => {
                self.metrics = metrics::recompute(ViewportMode::Panned, &self.measurements);
                commands.extend(
                    self.pan
                        .acquire(&self.metrics, viewport.height, self.raw_offset),
                );
                let max_scroll = self.pan.max_scroll().unwrap_or(0.0);
                self.mapper = ScrollCoordinateMapper::panned(count, max_scroll);
                debug!(
                    "panned layout: total {} viewport {} max scroll {max_scroll}",
                    self.metrics.total_extent, self.metrics.viewport_extent
                );
            }
        }

        commands.extend(self.sync_active());
        commands
    }

    fn sync_active(&mut self) -> Vec<HostCommand> {
        self.tracker
            .sync(&self.mapper, self.raw_offset)
            .map(|index| HostCommand::ActiveSectionChanged { index })
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use panscroll_protocol::Viewport;

    use super::*;

    fn sections(n: usize) -> SectionList {
        SectionList::from_entries(
            (0..n).map(|i| (format!("{i:02}"), format!("label {i}"), format!("name {i}"))),
        )
    }

    /// Narrow enough breakpoint that a 1000px viewport pans.
    fn config() -> EngineConfig {
        EngineConfig {
            breakpoint_px: 960.0,
            ..Default::default()
        }
    }

    fn panned(n: usize) -> Measurements {
        Measurements {
            viewport: Viewport::new(1000.0, 800.0),
            document_height: 800.0,
            section_extents: vec![Some(1000.0); n],
            section_tops: vec![Some(0.0); n],
            pending_images: 0,
        }
    }

    fn stacked(n: usize) -> Measurements {
        Measurements {
            viewport: Viewport::new(600.0, 800.0),
            document_height: 800.0 * n as f64,
            section_extents: vec![Some(600.0); n],
            section_tops: (0..n).map(|i| Some(800.0 * i as f64)).collect(),
            pending_images: 0,
        }
    }

    #[test]
    fn five_equal_sections_end_to_end() {
        let mut engine = ScrollEngine::new(config(), sections(5));
        let cmds = engine.mount(panned(5), 0.0);
        assert!(cmds.contains(&HostCommand::SetDocumentHeight { height: 4800.0 }));
        assert!(cmds.contains(&HostCommand::ActiveSectionChanged { index: 0 }));
        assert_eq!(engine.mode(), ViewportMode::Panned);
        assert!((engine.mapper().max_scroll() - 4000.0).abs() < f64::EPSILON);

        let cmds = engine.scroll(2000.0);
        assert_eq!(
            cmds,
            vec![
                HostCommand::SetStripOffset { x: -2000.0 },
                HostCommand::ActiveSectionChanged { index: 2 },
            ]
        );
        assert!((engine.progress() - 0.5).abs() < f64::EPSILON);
        assert_eq!(engine.active_index(), 2);
    }

    #[test]
    fn events_before_mount_are_ignored() {
        let mut engine = ScrollEngine::new(config(), sections(3));
        assert!(engine.scroll(100.0).is_empty());
        assert!(engine.go_next().is_empty());
        assert!(engine.play().is_empty());
        assert!(engine.unmount().is_empty());
    }

    #[test]
    fn stacked_navigation_targets_section_tops() {
        let mut engine = ScrollEngine::new(config(), sections(4));
        engine.mount(stacked(4), 0.0);
        assert_eq!(engine.mode(), ViewportMode::Stacked);
        assert!(!engine.is_panning());
        assert_eq!(
            engine.go_to(2),
            vec![HostCommand::SmoothScrollTo { top: 1600.0 }]
        );
    }

    #[test]
    fn switching_to_stacked_releases_pan() {
        let mut engine = ScrollEngine::new(config(), sections(3));
        engine.mount(panned(3), 0.0);
        engine.scroll(500.0);
        let cmds = engine.resize(stacked(3));
        assert!(cmds.contains(&HostCommand::ResetDocumentHeight));
        assert!(cmds.contains(&HostCommand::SetStripOffset { x: 0.0 }));
        assert!(!engine.is_panning());
        assert!(engine.metrics().is_sentinel());
    }

    #[test]
    fn unsubscribed_mode_listener_is_not_called() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut engine = ScrollEngine::new(config(), sections(3));
        engine.mount(panned(3), 0.0);
        let sink = Rc::clone(&seen);
        let id = engine.on_mode_change(move |change| sink.borrow_mut().push(change.to));

        assert!(engine.unsubscribe_mode_change(id));
        engine.resize(stacked(3));
        assert_eq!(engine.mode(), ViewportMode::Stacked);
        assert!(seen.borrow().is_empty());
        assert!(!engine.unsubscribe_mode_change(id));
    }

    #[test]
    fn escape_closes_menu() {
        let mut engine = ScrollEngine::new(config(), sections(3));
        engine.mount(panned(3), 0.0);
        engine.open_menu();
        let cmds = engine.user_input(UserInput::KeyDown { key: Key::Escape });
        assert!(cmds.contains(&HostCommand::SetScrollLock { locked: false }));
        assert!(!engine.is_menu_open());
    }

    #[test]
    fn menu_selection_unlocks_before_scrolling() {
        let mut engine = ScrollEngine::new(config(), sections(3));
        engine.mount(panned(3), 0.0);
        engine.open_menu();
        let cmds = engine.select_menu_item(2);
        let unlock = cmds
            .iter()
            .position(|c| *c == HostCommand::SetScrollLock { locked: false });
        let scroll = cmds
            .iter()
            .position(|c| matches!(c, HostCommand::SmoothScrollTo { .. }));
        assert!(unlock.is_some() && scroll.is_some() && unlock < scroll);
    }
}
