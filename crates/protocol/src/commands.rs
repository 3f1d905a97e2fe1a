use serde::{Deserialize, Serialize};

/// Identifies one armed auto-advance timer.
///
/// The host echoes the token back when the timer fires, which lets the
/// engine discard firings that belong to a cancelled session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerToken(pub u32);

/// Host event streams the engine subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventSource {
    /// Passive `scroll` listener on the window.
    Scroll,
    Resize,
    /// `wheel`, `touchmove` and `keydown`, used to interrupt auto-advance.
    UserInput,
    /// `load` / `error` on images inside the section strip.
    ImageLoad,
}

/// A single side effect for the host to perform.
///
/// Engine operations return a `Vec<HostCommand>` that the host applies in
/// order. Each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostCommand {
    Listen {
        source: EventSource,
    },
    Unlisten {
        source: EventSource,
    },

    /// Animated scroll of the page to an absolute vertical offset.
    SmoothScrollTo {
        top: f64,
    },

    /// Override the document's scrollable height (panned mode only).
    SetDocumentHeight {
        height: f64,
    },

    /// Drop the height override and return to native layout.
    ResetDocumentHeight,

    /// Translate the section strip horizontally. Zero is neutral.
    SetStripOffset {
        x: f64,
    },

    ArmTimer {
        token: TimerToken,
        delay_ms: u32,
    },
    ClearTimer {
        token: TimerToken,
    },

    /// Lock or unlock page scrolling (menu overlay).
    SetScrollLock {
        locked: bool,
    },

    SetMenuOpen {
        open: bool,
    },

    ActiveSectionChanged {
        index: usize,
    },
}

/// Keys the engine cares about. Anything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Key {
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// User-originated input that interrupts auto-advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UserInput {
    Wheel,
    TouchMove,
    KeyDown { key: Key },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_tagged_for_javascript() {
        let json = serde_json::to_string(&HostCommand::ArmTimer {
            token: TimerToken(7),
            delay_ms: 3000,
        })
        .unwrap_or_default();
        assert_eq!(json, r#"{"type":"armTimer","token":7,"delayMs":3000}"#);

        let json = serde_json::to_string(&HostCommand::ResetDocumentHeight).unwrap_or_default();
        assert_eq!(json, r#"{"type":"resetDocumentHeight"}"#);
    }

    #[test]
    fn user_input_from_json() {
        let input: UserInput =
            serde_json::from_str(r#"{"kind":"keyDown","key":"escape"}"#).unwrap_or(UserInput::Wheel);
        assert_eq!(
            input,
            UserInput::KeyDown {
                key: Key::Escape
            }
        );
    }

    #[test]
    fn dom_key_names() {
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("ArrowDown"), Key::Other);
    }
}
