use panscroll_protocol::{ScrollState, ViewportMode};

/// Bidirectional transform between vertical scroll offset and section index.
///
/// Every widget reads the same instance, so a highlighted section and the
/// offset a click scrolls to can never disagree.
///
/// The active index uses equal-width buckets of scroll progress regardless
/// of each section's measured width. This keeps it consistent with
/// [`index_to_offset`](Self::index_to_offset) in panned mode, at the cost of
/// the highlight boundary not lining up with unequal on-screen sections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScrollCoordinateMapper {
    mode: Option<ViewportMode>,
    section_count: usize,
    max_scroll: f64,
    stacked_tops: Vec<Option<f64>>,
}

impl ScrollCoordinateMapper {
    /// Panned mapping. `max_scroll` is document height minus viewport height.
    pub fn panned(section_count: usize, max_scroll: f64) -> Self {
        Self {
            mode: Some(ViewportMode::Panned),
            section_count,
            max_scroll: sanitize(max_scroll),
            stacked_tops: Vec::new(),
        }
    }

    /// Stacked mapping. Targets come from the sections' measured tops.
    pub fn stacked(section_count: usize, max_scroll: f64, tops: Vec<Option<f64>>) -> Self {
        Self {
            mode: Some(ViewportMode::Stacked),
            section_count,
            max_scroll: sanitize(max_scroll),
            stacked_tops: tops,
        }
    }

    /// Layout not known yet. Nothing resolves and every offset maps to the
    /// first section.
    pub fn unresolved(section_count: usize) -> Self {
        Self {
            section_count,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> Option<ViewportMode> {
        self.mode
    }

    pub fn section_count(&self) -> usize {
        self.section_count
    }

    pub fn max_scroll(&self) -> f64 {
        self.max_scroll
    }

    /// Scroll offset that brings `index` into view, or `None` when the
    /// target cannot be resolved (out of range, or not measured yet).
    pub fn index_to_offset(&self, index: usize) -> Option<f64> {
        if index >= self.section_count {
            return None;
        }
        match self.mode? {
            ViewportMode::Stacked => self
                .stacked_tops
                .get(index)
                .copied()
                .flatten()
                .filter(|top| top.is_finite())
                .map(|top| top.max(0.0)),
            ViewportMode::Panned => {
                if self.section_count <= 1 {
                    return Some(0.0);
                }
                let last = self.section_count - 1;
                if index == last {
                    // Exact endpoint, no rounding short of the end.
                    return Some(self.max_scroll);
                }
                Some(index as f64 / last as f64 * self.max_scroll)
            }
        }
    }

    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self, raw_offset: f64) -> f64 {
        if self.max_scroll <= 0.0 || !raw_offset.is_finite() {
            return 0.0;
        }
        (raw_offset / self.max_scroll).clamp(0.0, 1.0)
    }

    pub fn scroll_state(&self, raw_offset: f64) -> ScrollState {
        ScrollState {
            raw_offset,
            progress: self.progress(raw_offset),
        }
    }

    /// Active section for a raw scroll offset. Zero sections map to 0.
    pub fn offset_to_index(&self, raw_offset: f64) -> usize {
        bucket_index(self.progress(raw_offset), self.section_count)
    }
}

/// `floor(progress × count)` clamped to a valid index.
pub fn bucket_index(progress: f64, section_count: usize) -> usize {
    if section_count == 0 {
        return 0;
    }
    let bucket = (progress * section_count as f64).floor();
    if bucket <= 0.0 {
        0
    } else {
        (bucket as usize).min(section_count - 1)
    }
}

fn sanitize(max_scroll: f64) -> f64 {
    if max_scroll.is_finite() {
        max_scroll.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panned_round_trip() {
        for count in 2..=12 {
            for max in [1.0, 997.0, 4000.0, 12_345.6] {
                let mapper = ScrollCoordinateMapper::panned(count, max);
                for index in 0..count {
                    let offset = mapper.index_to_offset(index).unwrap_or(f64::NAN);
                    assert_eq!(
                        mapper.offset_to_index(offset),
                        index,
                        "count={count} max={max} index={index} offset={offset}"
                    );
                }
            }
        }
    }

    #[test]
    fn last_index_lands_exactly_on_max() {
        let mapper = ScrollCoordinateMapper::panned(7, 3333.3);
        assert_eq!(mapper.index_to_offset(6), Some(3333.3));
    }

    #[test]
    fn endpoints() {
        let mapper = ScrollCoordinateMapper::panned(5, 4000.0);
        assert_eq!(mapper.offset_to_index(0.0), 0);
        assert_eq!(mapper.offset_to_index(4000.0), 4);
        assert_eq!(mapper.offset_to_index(-50.0), 0);
        assert_eq!(mapper.offset_to_index(9000.0), 4);
    }

    #[test]
    fn monotonic_in_offset() {
        let mapper = ScrollCoordinateMapper::panned(5, 4000.0);
        let mut previous = 0;
        let mut offset = -100.0;
        while offset <= 4100.0 {
            let index = mapper.offset_to_index(offset);
            assert!(index >= previous, "offset={offset}");
            previous = index;
            offset += 7.5;
        }
        assert_eq!(previous, 4);
    }

    #[test]
    fn five_equal_sections_midpoint() {
        let mapper = ScrollCoordinateMapper::panned(5, 4000.0);
        let state = mapper.scroll_state(2000.0);
        assert!((state.progress - 0.5).abs() < f64::EPSILON);
        assert_eq!(mapper.offset_to_index(2000.0), 2);
    }

    #[test]
    fn degenerate_counts() {
        let single = ScrollCoordinateMapper::panned(1, 500.0);
        assert_eq!(single.index_to_offset(0), Some(0.0));
        assert_eq!(single.offset_to_index(500.0), 0);

        let empty = ScrollCoordinateMapper::panned(0, 500.0);
        assert_eq!(empty.index_to_offset(0), None);
        assert_eq!(empty.offset_to_index(250.0), 0);

        let unscrollable = ScrollCoordinateMapper::panned(4, 0.0);
        assert_eq!(unscrollable.progress(100.0), 0.0);
        assert_eq!(unscrollable.offset_to_index(100.0), 0);
    }

    #[test]
    fn stacked_uses_measured_tops() {
        let mapper = ScrollCoordinateMapper::stacked(
            3,
            2400.0,
            vec![Some(0.0), Some(900.0), None],
        );
        assert_eq!(mapper.index_to_offset(1), Some(900.0));
        assert_eq!(mapper.index_to_offset(2), None);
        assert_eq!(mapper.index_to_offset(3), None);
        assert_eq!(mapper.offset_to_index(1200.0), 1);
    }

    #[test]
    fn unconfigured_mapper_resolves_nothing() {
        let mapper = ScrollCoordinateMapper::default();
        assert_eq!(mapper.index_to_offset(0), None);
        assert_eq!(mapper.offset_to_index(10.0), 0);
    }

    #[test]
    fn unresolved_mapper_keeps_count_but_resolves_nothing() {
        let mapper = ScrollCoordinateMapper::unresolved(5);
        assert_eq!(mapper.section_count(), 5);
        assert_eq!(mapper.mode(), None);
        for index in 0..5 {
            assert_eq!(mapper.index_to_offset(index), None);
        }
        assert_eq!(mapper.offset_to_index(3000.0), 0);
    }
}
