use log::debug;
use panscroll_protocol::{HostCommand, LayoutMetrics};

use super::metrics::panned_document_height;

/// The document-height override held while panned.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PanLease {
    document_height: f64,
    pan_distance: f64,
    max_scroll: f64,
}

/// Re-expresses vertical scroll as a horizontal pan of the section strip.
///
/// Owns the only global side effects of panned mode: the stretched document
/// height and the strip translation. Both are set on [`acquire`](Self::acquire)
/// and restored to neutral on [`release`](Self::release).
#[derive(Debug, Default)]
pub struct PanDriver {
    lease: Option<PanLease>,
}

impl PanDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.lease.is_some()
    }

    /// Take (or refresh) the override for fresh metrics, then re-apply the
    /// pan for the current offset.
    pub fn acquire(
        &mut self,
        metrics: &LayoutMetrics,
        viewport_height: f64,
        raw_offset: f64,
    ) -> Vec<HostCommand> {
        let document_height = panned_document_height(metrics, viewport_height);
        let lease = PanLease {
            document_height,
            pan_distance: metrics.pan_distance(),
            max_scroll: document_height - viewport_height,
        };
        if self.lease.is_none() {
            debug!("pan acquired: document height {document_height}");
        }
        self.lease = Some(lease);
        vec![
            HostCommand::SetDocumentHeight {
                height: document_height,
            },
            HostCommand::SetStripOffset {
                x: strip_offset(&lease, raw_offset),
            },
        ]
    }

    /// Restore native layout. Releasing an idle driver does nothing.
    pub fn release(&mut self) -> Vec<HostCommand> {
        if self.lease.take().is_none() {
            return Vec::new();
        }
        debug!("pan released");
        vec![
            HostCommand::ResetDocumentHeight,
            HostCommand::SetStripOffset { x: 0.0 },
        ]
    }

    /// Scroll offset range while the override is held.
    pub fn max_scroll(&self) -> Option<f64> {
        self.lease.map(|l| l.max_scroll)
    }

    pub fn document_height(&self) -> Option<f64> {
        self.lease.map(|l| l.document_height)
    }

    /// Strip translation for a scroll offset, if panning.
    pub fn on_scroll(&self, raw_offset: f64) -> Option<HostCommand> {
        self.lease.map(|lease| HostCommand::SetStripOffset {
            x: strip_offset(&lease, raw_offset),
        })
    }
}

/// `−(raw / maxScroll) × panDistance`, scrub-linked to the scroll position.
fn strip_offset(lease: &PanLease, raw_offset: f64) -> f64 {
    if lease.max_scroll <= 0.0 || !raw_offset.is_finite() {
        return 0.0;
    }
    let progress = (raw_offset / lease.max_scroll).clamp(0.0, 1.0);
    -(progress * lease.pan_distance)
}
