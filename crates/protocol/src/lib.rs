pub mod commands;
pub mod section;
pub mod shared_str;
pub mod types;

pub use commands::{EventSource, HostCommand, Key, TimerToken, UserInput};
pub use section::SectionDescriptor;
pub use shared_str::SharedStr;
pub use types::{
    LayoutMetrics, Measurements, NavGeometry, Rect, ScrollState, UnderlineGeometry, Viewport,
    ViewportMode,
};
