use log::debug;
use panscroll_protocol::{EventSource, HostCommand, SharedStr};
use serde::Serialize;

use crate::model::SectionList;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub index: usize,
    pub display_name: SharedStr,
    /// Draw a separator below this item.
    pub separated: bool,
}

pub fn menu_items(sections: &SectionList) -> Vec<MenuItem> {
    let count = sections.len();
    sections
        .iter()
        .map(|section| MenuItem {
            index: section.index,
            display_name: section.display_name.clone(),
            separated: section.index + 1 < count,
        })
        .collect()
}

/// Full-screen menu overlay. Page scroll is locked while it is open, and
/// key presses are listened for so Escape can close it.
#[derive(Debug, Default)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) -> Vec<HostCommand> {
        self.set_open(true)
    }

    pub fn close(&mut self) -> Vec<HostCommand> {
        self.set_open(false)
    }

    pub fn toggle(&mut self) -> Vec<HostCommand> {
        self.set_open(!self.open)
    }

    fn set_open(&mut self, open: bool) -> Vec<HostCommand> {
        if self.open == open {
            return Vec::new();
        }
        debug!("nav menu {}", if open { "opened" } else { "closed" });
        self.open = open;
        let source = EventSource::UserInput;
        vec![
            HostCommand::SetMenuOpen { open },
            HostCommand::SetScrollLock { locked: open },
            if open {
                HostCommand::Listen { source }
            } else {
                HostCommand::Unlisten { source }
            },
        ]
    }
}
