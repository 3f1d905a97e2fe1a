pub mod autoadvance;
pub mod mapper;
pub mod metrics;
pub mod navigation;
pub mod pan;
pub mod tracker;
pub mod viewport;

pub use autoadvance::{AutoAdvanceController, AutoAdvanceState};
pub use mapper::ScrollCoordinateMapper;
pub use metrics::{ImageGate, ImageOutcome};
pub use navigation::{NavTarget, Navigation, NavigationCommander};
pub use pan::PanDriver;
pub use tracker::ActiveSectionTracker;
pub use viewport::{ModeChange, ViewportModeDetector};
