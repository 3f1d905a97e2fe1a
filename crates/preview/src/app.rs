use std::time::Instant;

use panscroll_core::{EngineConfig, ScrollEngine, SectionList};
use panscroll_protocol::{EventSource, HostCommand, Key, UserInput};

use crate::host::{PX_PER_ROW, SimPage};

/// What the visitor did, already translated from terminal keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Wheel-style scroll by this many rows.
    Scroll(i32),
    Next,
    Prev,
    Home,
    TogglePlay,
    ToggleMenu,
    /// Header link or, with the menu open, menu entry.
    Select(usize),
    Escape,
    OtherKey,
}

/// Engine plus simulated page, wired together like the browser glue.
#[derive(Debug)]
pub struct App {
    pub engine: ScrollEngine,
    pub page: SimPage,
}

impl App {
    pub fn new(config: EngineConfig, sections: SectionList, cols: u16, rows: u16) -> Self {
        let page = SimPage::new(sections.len(), config.breakpoint_px, cols, rows);
        let mut app = Self {
            engine: ScrollEngine::new(config, sections),
            page,
        };
        let commands = app.engine.mount(app.page.measure(), app.page.scroll_y);
        app.dispatch(commands, Instant::now());
        app
    }

    /// Apply commands, then feed any resulting scroll event back in until
    /// the page settles.
    pub fn dispatch(&mut self, commands: Vec<HostCommand>, now: Instant) {
        let mut pending = commands;
        loop {
            self.page.apply(pending, now);
            if !self.page.take_scroll_event() {
                break;
            }
            pending = self.engine.scroll(self.page.scroll_y);
        }
    }

    /// One animation frame: advance smooth scrolling, fire due timers.
    pub fn tick(&mut self, now: Instant) {
        self.page.step_scroll();
        self.dispatch(Vec::new(), now);
        for token in self.page.due_timers(now) {
            let commands = self.engine.timer_fired(token);
            self.dispatch(commands, now);
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16, now: Instant) {
        self.page.resize(cols, rows);
        let mut commands = Vec::new();
        if self.page.is_listening(EventSource::Resize) {
            commands = self.engine.resize(self.page.measure());
        }
        self.dispatch(commands, now);
    }

    pub fn handle(&mut self, action: Action, now: Instant) {
        let commands = match action {
            Action::Scroll(rows) => {
                self.input(UserInput::Wheel, now);
                self.page.scroll_by(f64::from(rows) * PX_PER_ROW);
                Vec::new()
            }
            Action::Next => self.engine.go_next(),
            Action::Prev => self.engine.go_prev(),
            Action::Home => self.engine.go_home(),
            Action::TogglePlay => self.engine.toggle_play(),
            Action::ToggleMenu => self.engine.toggle_menu(),
            Action::Select(index) if self.page.menu_open => self.engine.select_menu_item(index),
            Action::Select(index) => self.engine.go_to(index),
            Action::Escape => {
                self.input(UserInput::KeyDown { key: Key::Escape }, now);
                Vec::new()
            }
            Action::OtherKey => {
                self.input(UserInput::KeyDown { key: Key::Other }, now);
                Vec::new()
            }
        };
        self.dispatch(commands, now);
    }

    pub fn shutdown(&mut self, now: Instant) {
        let commands = self.engine.unmount();
        self.dispatch(commands, now);
    }

    fn input(&mut self, input: UserInput, now: Instant) {
        if self.page.is_listening(EventSource::UserInput) {
            let commands = self.engine.user_input(input);
            self.dispatch(commands, now);
        }
    }
}
