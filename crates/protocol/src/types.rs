use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in CSS pixels, as reported by the host's layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Visible window size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// How the section sequence is laid out for the current viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewportMode {
    /// Sections are stacked vertically and scroll natively.
    Stacked,
    /// Sections sit side by side; vertical scroll drives a horizontal pan.
    Panned,
}

impl std::fmt::Display for ViewportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stacked => write!(f, "stacked"),
            Self::Panned => write!(f, "panned"),
        }
    }
}

/// Measured section boundaries along the panning axis.
///
/// In stacked mode native layout does the work, so the snapshot is the
/// empty sentinel returned by [`LayoutMetrics::stacked`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMetrics {
    pub section_extents: Vec<f64>,
    pub viewport_extent: f64,
    pub total_extent: f64,
}

impl LayoutMetrics {
    /// Sentinel used while stacked.
    pub fn stacked() -> Self {
        Self::default()
    }

    pub fn from_extents(section_extents: Vec<f64>, viewport_extent: f64) -> Self {
        let total_extent = section_extents.iter().sum();
        Self {
            section_extents,
            viewport_extent,
            total_extent,
        }
    }

    /// Horizontal distance the strip travels from first to last frame.
    pub fn pan_distance(&self) -> f64 {
        (self.total_extent - self.viewport_extent).max(0.0)
    }

    pub fn is_sentinel(&self) -> bool {
        self.section_extents.is_empty()
    }
}

/// Native scroll position plus its normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollState {
    pub raw_offset: f64,
    /// Always within `[0, 1]`.
    pub progress: f64,
}

/// Position of the header's sliding underline relative to its nav bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UnderlineGeometry {
    pub left: f64,
    pub width: f64,
}

impl UnderlineGeometry {
    /// Zero width hides the indicator.
    pub const HIDDEN: Self = Self {
        left: 0.0,
        width: 0.0,
    };

    pub fn is_visible(&self) -> bool {
        self.width > 0.0
    }
}

/// Layout snapshot pushed by the host whenever something may have moved.
///
/// Per-section entries are `None` when the element is not mounted yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Measurements {
    pub viewport: Viewport,
    /// Full scrollable height of the document as laid out natively, without
    /// any `SetDocumentHeight` override. A host that measures before applying
    /// `ResetDocumentHeight` must report a fresh measurement afterwards.
    pub document_height: f64,
    /// Width of each section element (the panning axis).
    pub section_extents: Vec<Option<f64>>,
    /// Document-relative top of each section element in stacked layout.
    pub section_tops: Vec<Option<f64>>,
    /// Images inside the section strip that have not fired load or error yet.
    pub pending_images: usize,
}

/// Header nav bar geometry used to place the underline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavGeometry {
    pub bar: Option<Rect>,
    /// Indexed by section index; the home section usually has no link.
    pub links: Vec<Option<Rect>>,
}
