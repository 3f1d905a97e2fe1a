//! Presentation widgets. They read engine state and issue navigation
//! requests; none of them computes scroll offsets on its own.

pub mod header;
pub mod indicator;
pub mod nav_menu;

pub use header::{HeaderLink, header_links, underline};
pub use indicator::{IndicatorInput, IndicatorView, ProgressRing, indicator_view};
pub use nav_menu::{MenuItem, NavMenu, menu_items};
