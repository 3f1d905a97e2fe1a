use log::debug;
use panscroll_protocol::HostCommand;
use serde::{Deserialize, Serialize};

use super::mapper::ScrollCoordinateMapper;

/// A navigation request from a widget or the auto-advance timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "to", content = "index", rename_all = "camelCase")]
pub enum NavTarget {
    Index(usize),
    Next,
    Prev,
    Home,
}

/// A resolved jump: which section, and where the page scrolls to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Navigation {
    pub index: usize,
    pub top: f64,
}

impl Navigation {
    pub fn command(&self) -> HostCommand {
        HostCommand::SmoothScrollTo { top: self.top }
    }
}

/// Resolves navigation requests against the shared mapper.
///
/// `goHome` is `goTo(0)` in both modes: the mapper already knows that
/// index 0 is the page top when stacked and the strip start when panned.
#[derive(Debug, Clone, Copy)]
pub struct NavigationCommander<'a> {
    mapper: &'a ScrollCoordinateMapper,
    active: usize,
}

impl<'a> NavigationCommander<'a> {
    pub fn new(mapper: &'a ScrollCoordinateMapper, active: usize) -> Self {
        Self { mapper, active }
    }

    pub fn resolve(&self, target: NavTarget) -> Option<Navigation> {
        match target {
            NavTarget::Index(index) => self.go_to(index),
            NavTarget::Next => self.go_next(),
            NavTarget::Prev => self.go_prev(),
            NavTarget::Home => self.go_home(),
        }
    }

    pub fn go_to(&self, index: usize) -> Option<Navigation> {
        let Some(top) = self.mapper.index_to_offset(index) else {
            debug!("navigation to section {index} skipped: target not resolvable");
            return None;
        };
        Some(Navigation { index, top })
    }

    /// No-op on the last section.
    pub fn go_next(&self) -> Option<Navigation> {
        let next = self.active + 1;
        if next >= self.mapper.section_count() {
            return None;
        }
        self.go_to(next)
    }

    /// No-op on the first section.
    pub fn go_prev(&self) -> Option<Navigation> {
        let prev = self.active.checked_sub(1)?;
        self.go_to(prev)
    }

    pub fn go_home(&self) -> Option<Navigation> {
        self.go_to(0)
    }

    pub fn can_go_next(&self) -> bool {
        self.active + 1 < self.mapper.section_count()
    }

    pub fn can_go_prev(&self) -> bool {
        self.active > 0 && self.mapper.section_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_and_prev_are_guarded_at_ends() {
        let mapper = ScrollCoordinateMapper::panned(4, 3000.0);
        let at_start = NavigationCommander::new(&mapper, 0);
        assert_eq!(at_start.go_prev(), None);
        assert_eq!(
            at_start.go_next(),
            Some(Navigation {
                index: 1,
                top: 1000.0
            })
        );

        let at_end = NavigationCommander::new(&mapper, 3);
        assert_eq!(at_end.go_next(), None);
        assert!(!at_end.can_go_next());
        assert!(at_end.can_go_prev());
        assert_eq!(at_end.go_prev().map(|n| n.index), Some(2));
    }

    #[test]
    fn home_is_index_zero_in_both_modes() {
        let panned = ScrollCoordinateMapper::panned(4, 3000.0);
        let nav = NavigationCommander::new(&panned, 2);
        assert_eq!(nav.resolve(NavTarget::Home).map(|n| n.top), Some(0.0));

        let stacked =
            ScrollCoordinateMapper::stacked(2, 900.0, vec![Some(0.0), Some(700.0)]);
        let nav = NavigationCommander::new(&stacked, 1);
        assert_eq!(nav.go_home().map(|n| n.command()), Some(HostCommand::SmoothScrollTo { top: 0.0 }));
    }

    #[test]
    fn unresolvable_targets_are_skipped() {
        let stacked = ScrollCoordinateMapper::stacked(3, 900.0, vec![Some(0.0)]);
        let nav = NavigationCommander::new(&stacked, 0);
        assert_eq!(nav.go_to(2), None);
        assert_eq!(nav.go_to(9), None);
    }

    #[test]
    fn nav_target_json_shape() {
        let target: NavTarget =
            serde_json::from_str(r#"{"to":"index","index":3}"#).unwrap_or(NavTarget::Home);
        assert_eq!(target, NavTarget::Index(3));
        let target: NavTarget = serde_json::from_str(r#"{"to":"next"}"#).unwrap_or(NavTarget::Home);
        assert_eq!(target, NavTarget::Next);
    }
}
