//! Browser bindings for the panscroll engine.
//!
//! JavaScript owns the DOM. It measures the page, forwards events, and
//! applies the host commands each call returns (a JSON array, see
//! `panscroll_protocol::HostCommand`).
//!
//! ```javascript
//! import init, { PanScroll } from 'panscroll-wasm';
//!
//! await init();
//! const engine = new PanScroll(JSON.stringify(sections));
//! apply(engine.mount(JSON.stringify(measure()), window.scrollY));
//! window.addEventListener('scroll', () => apply(engine.scroll(window.scrollY)), { passive: true });
//! ```

use panscroll_core::{EngineConfig, ImageOutcome, NavTarget, ScrollEngine, SectionList};
use panscroll_protocol::{HostCommand, Key, Measurements, NavGeometry, TimerToken, UserInput};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

/// Set up the panic hook and console logging.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
}

#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

fn from_json<T: DeserializeOwned>(data: &str, what: &str) -> Result<T, JsError> {
    serde_json::from_str(data).map_err(|e| JsError::new(&format!("invalid {what}: {e}")))
}

fn commands(commands: Vec<HostCommand>) -> Result<String, JsError> {
    to_json(&commands)
}

/// One engine instance bound to one page.
#[wasm_bindgen]
pub struct PanScroll {
    engine: ScrollEngine,
}

#[wasm_bindgen]
impl PanScroll {
    /// `sections_json`: array of `{code, label, name}` or full descriptors.
    /// `config_json`: optional `{breakpointPx, dwellMs, edgeTriggered}`.
    #[wasm_bindgen(constructor)]
    pub fn new(sections_json: &str, config_json: Option<String>) -> Result<PanScroll, JsError> {
        let sections =
            SectionList::from_json(sections_json).map_err(|e| JsError::new(&e.to_string()))?;
        let config = match config_json {
            Some(data) => EngineConfig::from_json(&data).map_err(|e| JsError::new(&e.to_string()))?,
            None => EngineConfig::default(),
        };
        log::debug!("panscroll created with {} sections", sections.len());
        Ok(PanScroll {
            engine: ScrollEngine::new(config, sections),
        })
    }

    pub fn mount(&mut self, measurements_json: &str, scroll_y: f64) -> Result<String, JsError> {
        let measurements: Measurements = from_json(measurements_json, "measurements")?;
        commands(self.engine.mount(measurements, scroll_y))
    }

    pub fn unmount(&mut self) -> Result<String, JsError> {
        commands(self.engine.unmount())
    }

    /// If the result contains `resetDocumentHeight`, apply it and call
    /// `contentChanged` with a fresh measurement.
    pub fn resize(&mut self, measurements_json: &str) -> Result<String, JsError> {
        let measurements: Measurements = from_json(measurements_json, "measurements")?;
        commands(self.engine.resize(measurements))
    }

    #[wasm_bindgen(js_name = contentChanged)]
    pub fn content_changed(&mut self, measurements_json: &str) -> Result<String, JsError> {
        let measurements: Measurements = from_json(measurements_json, "measurements")?;
        commands(self.engine.content_changed(measurements))
    }

    /// Call from each strip image's `load` (`failed = false`) or `error`
    /// (`failed = true`) handler.
    #[wasm_bindgen(js_name = imageSettled)]
    pub fn image_settled(&mut self, failed: bool) -> Result<String, JsError> {
        let outcome = if failed {
            ImageOutcome::Failed
        } else {
            ImageOutcome::Loaded
        };
        commands(self.engine.image_settled(outcome))
    }

    pub fn scroll(&mut self, scroll_y: f64) -> Result<String, JsError> {
        commands(self.engine.scroll(scroll_y))
    }

    pub fn wheel(&mut self) -> Result<String, JsError> {
        commands(self.engine.user_input(UserInput::Wheel))
    }

    #[wasm_bindgen(js_name = touchMove)]
    pub fn touch_move(&mut self) -> Result<String, JsError> {
        commands(self.engine.user_input(UserInput::TouchMove))
    }

    /// `key` is `KeyboardEvent.key`.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> Result<String, JsError> {
        commands(self.engine.user_input(UserInput::KeyDown {
            key: Key::from_dom(key),
        }))
    }

    #[wasm_bindgen(js_name = timerFired)]
    pub fn timer_fired(&mut self, token: u32) -> Result<String, JsError> {
        commands(self.engine.timer_fired(TimerToken(token)))
    }

    /// `target_json`: `{"to":"index","index":2}`, `{"to":"next"}`,
    /// `{"to":"prev"}` or `{"to":"home"}`.
    pub fn navigate(&mut self, target_json: &str) -> Result<String, JsError> {
        let target: NavTarget = from_json(target_json, "navigation target")?;
        commands(self.engine.navigate(target))
    }

    #[wasm_bindgen(js_name = goTo)]
    pub fn go_to(&mut self, index: usize) -> Result<String, JsError> {
        commands(self.engine.go_to(index))
    }

    #[wasm_bindgen(js_name = goNext)]
    pub fn go_next(&mut self) -> Result<String, JsError> {
        commands(self.engine.go_next())
    }

    #[wasm_bindgen(js_name = goPrev)]
    pub fn go_prev(&mut self) -> Result<String, JsError> {
        commands(self.engine.go_prev())
    }

    #[wasm_bindgen(js_name = goHome)]
    pub fn go_home(&mut self) -> Result<String, JsError> {
        commands(self.engine.go_home())
    }

    pub fn play(&mut self) -> Result<String, JsError> {
        commands(self.engine.play())
    }

    pub fn pause(&mut self) -> Result<String, JsError> {
        commands(self.engine.pause())
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&mut self) -> Result<String, JsError> {
        commands(self.engine.toggle_play())
    }

    #[wasm_bindgen(js_name = openMenu)]
    pub fn open_menu(&mut self) -> Result<String, JsError> {
        commands(self.engine.open_menu())
    }

    #[wasm_bindgen(js_name = closeMenu)]
    pub fn close_menu(&mut self) -> Result<String, JsError> {
        commands(self.engine.close_menu())
    }

    #[wasm_bindgen(js_name = toggleMenu)]
    pub fn toggle_menu(&mut self) -> Result<String, JsError> {
        commands(self.engine.toggle_menu())
    }

    #[wasm_bindgen(js_name = selectMenuItem)]
    pub fn select_menu_item(&mut self, index: usize) -> Result<String, JsError> {
        commands(self.engine.select_menu_item(index))
    }

    #[wasm_bindgen(js_name = activeIndex)]
    pub fn active_index(&self) -> usize {
        self.engine.active_index()
    }

    pub fn progress(&self) -> f64 {
        self.engine.progress()
    }

    /// `"stacked"` or `"panned"`.
    pub fn mode(&self) -> String {
        self.engine.mode().to_string()
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    #[wasm_bindgen(js_name = isMenuOpen)]
    pub fn is_menu_open(&self) -> bool {
        self.engine.is_menu_open()
    }

    /// `{left, width}` for the header underline; width 0 means hidden.
    pub fn underline(&self, nav_json: &str) -> Result<String, JsError> {
        let nav: NavGeometry = from_json(nav_json, "nav geometry")?;
        to_json(&self.engine.underline(&nav))
    }

    pub fn indicator(&self) -> Result<String, JsError> {
        to_json(&self.engine.indicator())
    }

    /// `stroke-dashoffset` for the indicator's progress ring.
    #[wasm_bindgen(js_name = ringDashOffset)]
    pub fn ring_dash_offset(&self, radius: f64) -> f64 {
        self.engine.indicator().ring_dash_offset(radius)
    }

    #[wasm_bindgen(js_name = headerLinks)]
    pub fn header_links(&self) -> Result<String, JsError> {
        to_json(&self.engine.header_links())
    }

    #[wasm_bindgen(js_name = menuItems)]
    pub fn menu_items(&self) -> Result<String, JsError> {
        to_json(&self.engine.menu_items())
    }
}
