use log::debug;
use panscroll_protocol::{EventSource, HostCommand, TimerToken};

/// One running auto-advance sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Session {
    token: TimerToken,
    next_index: usize,
    last_index: usize,
    cancelled: bool,
}

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoAdvanceState {
    Idle,
    Running { next_index: usize },
}

/// Result of a timer firing that belonged to the live session.
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    /// Section to navigate to now.
    pub index: usize,
    /// Timer and listener bookkeeping for the host.
    pub commands: Vec<HostCommand>,
}

/// Timer-driven "go to next section" sequence.
///
/// At most one session exists. User input listeners are registered exactly
/// while a timer is armed. Every timer carries a token; a firing is only
/// honoured if its token matches the live session and that session has not
/// been cancelled, so a cancel that races a firing always wins.
#[derive(Debug)]
pub struct AutoAdvanceController {
    dwell_ms: u32,
    next_token: u32,
    session: Option<Session>,
}

impl AutoAdvanceController {
    pub fn new(dwell_ms: u32) -> Self {
        Self {
            dwell_ms,
            next_token: 0,
            session: None,
        }
    }

    pub fn state(&self) -> AutoAdvanceState {
        match self.session {
            Some(s) if !s.cancelled => AutoAdvanceState::Running {
                next_index: s.next_index,
            },
            _ => AutoAdvanceState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state(), AutoAdvanceState::Running { .. })
    }

    /// Start from `active`. Does nothing when already running or when
    /// there is nowhere left to advance to.
    pub fn play(&mut self, active: usize, section_count: usize) -> Vec<HostCommand> {
        if self.is_running() {
            return Vec::new();
        }
        let Some(last_index) = section_count.checked_sub(1) else {
            return Vec::new();
        };
        if active >= last_index {
            debug!("auto-advance not started: already on the last section");
            return Vec::new();
        }
        let token = self.mint_token();
        self.session = Some(Session {
            token,
            next_index: active + 1,
            last_index,
            cancelled: false,
        });
        debug!("auto-advance started at section {active}");
        vec![
            HostCommand::Listen {
                source: EventSource::UserInput,
            },
            HostCommand::ArmTimer {
                token,
                delay_ms: self.dwell_ms,
            },
        ]
    }

    pub fn pause(&mut self) -> Vec<HostCommand> {
        self.stop("paused")
    }

    /// The single play/pause control.
    pub fn toggle(&mut self, active: usize, section_count: usize) -> Vec<HostCommand> {
        if self.is_running() {
            self.pause()
        } else {
            self.play(active, section_count)
        }
    }

    /// Wheel, touch-move or key-down from the user.
    pub fn interrupt(&mut self) -> Vec<HostCommand> {
        self.stop("interrupted by user input")
    }

    fn live(&self, token: TimerToken) -> Option<Session> {
        self.session.filter(|s| s.token == token && !s.cancelled)
    }

    /// Section the live session advances to when `token` fires, or `None`
    /// for a stale or cancelled token.
    pub fn due(&self, token: TimerToken) -> Option<usize> {
        self.live(token).map(|s| s.next_index)
    }

    /// The firing could not navigate. Re-arm for the same section.
    pub fn hold(&mut self, token: TimerToken) -> Vec<HostCommand> {
        let Some(session) = self.live(token) else {
            return Vec::new();
        };
        let next_token = self.mint_token();
        self.session = Some(Session {
            token: next_token,
            ..session
        });
        vec![
            HostCommand::ClearTimer { token },
            HostCommand::ArmTimer {
                token: next_token,
                delay_ms: self.dwell_ms,
            },
        ]
    }

    /// Handle a timer firing that navigated. Stale or cancelled tokens
    /// yield `None`.
    pub fn on_timer(&mut self, token: TimerToken) -> Option<Advance> {
        let session = self.live(token)?;
        let index = session.next_index;

        if index >= session.last_index {
            self.session = None;
            debug!("auto-advance reached the last section");
            return Some(Advance {
                index,
                commands: vec![HostCommand::Unlisten {
                    source: EventSource::UserInput,
                }],
            });
        }

        let next_token = self.mint_token();
        self.session = Some(Session {
            token: next_token,
            next_index: index + 1,
            ..session
        });
        Some(Advance {
            index,
            commands: vec![
                HostCommand::ClearTimer { token },
                HostCommand::ArmTimer {
                    token: next_token,
                    delay_ms: self.dwell_ms,
                },
            ],
        })
    }

    /// Continue from `index` after an explicit jump while running.
    /// Jumping to the last section ends the session.
    pub fn retarget(&mut self, index: usize) -> Vec<HostCommand> {
        let Some(session) = self.session.as_mut().filter(|s| !s.cancelled) else {
            return Vec::new();
        };
        if index >= session.last_index {
            return self.stop("navigated to the last section");
        }
        session.next_index = index + 1;
        Vec::new()
    }

    fn stop(&mut self, reason: &str) -> Vec<HostCommand> {
        // Cancelled sessions stay in place until the next play replaces them.
        let Some(session) = self.session.as_mut().filter(|s| !s.cancelled) else {
            return Vec::new();
        };
        session.cancelled = true;
        debug!("auto-advance stopped: {reason}");
        vec![
            HostCommand::ClearTimer {
                token: session.token,
            },
            HostCommand::Unlisten {
                source: EventSource::UserInput,
            },
        ]
    }

    fn mint_token(&mut self) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        token
    }
}
