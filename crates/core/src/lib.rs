//! Scroll choreography for pages made of full-viewport sections.
//!
//! Narrow viewports stack the sections and scroll natively. Wide viewports
//! lay them side by side and turn vertical scroll into a horizontal pan.
//! [`ScrollEngine`] keeps the active section, programmatic navigation, the
//! auto-advance timer and the widgets on one shared coordinate mapping.
//!
//! ```text
//!   host events ──▶ ScrollEngine ──▶ HostCommand[] ──▶ host (browser, terminal)
//!   (resize,         (detector,       (SmoothScrollTo,
//!    scroll,          metrics,         SetDocumentHeight,
//!    input, timer)    mapper, pan…)    ArmTimer…)
//! ```

pub mod engine;
pub mod error;
pub mod listeners;
pub mod model;
pub mod scroll;
pub mod subscribers;
pub mod widgets;

pub use engine::ScrollEngine;
pub use error::{ConfigError, SectionError};
pub use model::{EngineConfig, SectionList};
pub use scroll::{ImageOutcome, NavTarget};
