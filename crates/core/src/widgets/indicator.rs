use std::f64::consts::TAU;

use panscroll_protocol::SharedStr;
use serde::Serialize;

use crate::model::SectionList;

/// Everything the bottom scroll indicator renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorView {
    pub index: usize,
    pub code: SharedStr,
    pub label: SharedStr,
    pub display_name: SharedStr,
    /// Scroll progress in `[0, 1]` for the circular ring.
    pub progress: f64,
    pub can_go_prev: bool,
    pub can_go_next: bool,
    pub playing: bool,
}

pub struct IndicatorInput {
    pub active: Option<usize>,
    pub progress: f64,
    pub playing: bool,
    /// From the navigation commander, so the arrows match what prev/next do.
    pub can_go_prev: bool,
    pub can_go_next: bool,
}

/// Build the indicator view. An unknown or out-of-range active index falls
/// back to the first section.
pub fn indicator_view(sections: &SectionList, input: &IndicatorInput) -> IndicatorView {
    let index = input
        .active
        .filter(|i| *i < sections.len())
        .unwrap_or(0);
    let (code, label, display_name) = match sections.get(index) {
        Some(s) => (s.code.clone(), s.label.clone(), s.display_name.clone()),
        None => Default::default(),
    };
    IndicatorView {
        index,
        code,
        label,
        display_name,
        progress: input.progress.clamp(0.0, 1.0),
        can_go_prev: input.can_go_prev,
        can_go_next: input.can_go_next,
        playing: input.playing,
    }
}

impl IndicatorView {
    /// Stroke dash offset for a progress ring of `radius`.
    pub fn ring_dash_offset(&self, radius: f64) -> f64 {
        ProgressRing { radius }.dash_offset(self.progress)
    }
}

/// Circular progress ring drawn with a dashed stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRing {
    pub radius: f64,
}

impl ProgressRing {
    pub fn circumference(&self) -> f64 {
        TAU * self.radius
    }

    /// `stroke-dashoffset` that reveals `progress` of the ring.
    pub fn dash_offset(&self, progress: f64) -> f64 {
        self.circumference() * (1.0 - progress.clamp(0.0, 1.0))
    }
}
