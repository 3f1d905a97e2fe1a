use log::debug;
use panscroll_protocol::{LayoutMetrics, Measurements, ViewportMode};
use serde::{Deserialize, Serialize};

/// Measure section boundaries for `mode`.
///
/// Stacked layout needs no measurements and yields the sentinel. Panned
/// layout sums the section widths in page order; a section that is not
/// mounted yet contributes nothing.
pub fn recompute(mode: ViewportMode, measurements: &Measurements) -> LayoutMetrics {
    match mode {
        ViewportMode::Stacked => LayoutMetrics::stacked(),
        ViewportMode::Panned => {
            let extents: Vec<f64> = measurements
                .section_extents
                .iter()
                .enumerate()
                .map(|(index, extent)| match extent {
                    Some(w) if w.is_finite() && *w >= 0.0 => *w,
                    _ => {
                        debug!("section {index} has no measurable width yet");
                        0.0
                    }
                })
                .collect();
            LayoutMetrics::from_extents(extents, measurements.viewport.width)
        }
    }
}

/// Document height that gives native vertical scroll exactly enough range
/// to drive the full horizontal pan.
pub fn panned_document_height(metrics: &LayoutMetrics, viewport_height: f64) -> f64 {
    metrics.pan_distance() + viewport_height
}

/// How an image inside the section strip finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageOutcome {
    Loaded,
    Failed,
}

/// Counts strip images that have not settled yet.
///
/// Panned measurements taken while images load are wrong, so metrics wait
/// for the gate to open. A failed image counts as settled.
#[derive(Debug, Clone, Default)]
pub struct ImageGate {
    pending: usize,
}

impl ImageGate {
    /// Replace the pending count from a fresh measurement.
    pub fn reset(&mut self, pending: usize) {
        self.pending = pending;
    }

    /// Record one settled image. Returns true when this settle opened the gate.
    pub fn settle(&mut self, outcome: ImageOutcome) -> bool {
        if outcome == ImageOutcome::Failed {
            debug!("strip image failed to load, treating as settled");
        }
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        self.pending == 0
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_open(&self) -> bool {
        self.pending == 0
    }
}

#[cfg(test)]
mod tests {
    use panscroll_protocol::Viewport;

    use super::*;

    fn panned_measurements(extents: Vec<Option<f64>>) -> Measurements {
        Measurements {
            viewport: Viewport::new(1000.0, 800.0),
            section_extents: extents,
            ..Default::default()
        }
    }

    #[test]
    fn stacked_is_sentinel() {
        let m = panned_measurements(vec![Some(1000.0); 3]);
        assert!(recompute(ViewportMode::Stacked, &m).is_sentinel());
    }

    #[test]
    fn panned_sums_extents() {
        let m = panned_measurements(vec![Some(1000.0), Some(1400.0), Some(600.0)]);
        let metrics = recompute(ViewportMode::Panned, &m);
        assert_eq!(metrics.section_extents.len(), 3);
        assert!((metrics.total_extent - 3000.0).abs() < f64::EPSILON);
        assert!((metrics.viewport_extent - 1000.0).abs() < f64::EPSILON);
        assert!((panned_document_height(&metrics, 800.0) - 2800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unmounted_sections_count_as_zero() {
        let m = panned_measurements(vec![Some(1000.0), None, Some(f64::NAN)]);
        let metrics = recompute(ViewportMode::Panned, &m);
        assert!((metrics.total_extent - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn gate_opens_on_last_image_even_if_it_failed() {
        let mut gate = ImageGate::default();
        gate.reset(2);
        assert!(!gate.is_open());
        assert!(!gate.settle(ImageOutcome::Loaded));
        assert!(gate.settle(ImageOutcome::Failed));
        assert!(gate.is_open());
        // Stray events after opening are ignored.
        assert!(!gate.settle(ImageOutcome::Loaded));
        assert_eq!(gate.pending(), 0);
    }
}
