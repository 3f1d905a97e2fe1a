use panscroll_protocol::{NavGeometry, SharedStr, UnderlineGeometry};
use serde::Serialize;

use crate::model::SectionList;

/// One link in the header nav bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderLink {
    pub index: usize,
    pub label: SharedStr,
    pub active: bool,
}

/// Links for every section except home, which the logo covers.
pub fn header_links(sections: &SectionList, active: usize) -> Vec<HeaderLink> {
    sections
        .iter()
        .skip(1)
        .map(|section| HeaderLink {
            index: section.index,
            label: section.label.clone(),
            active: section.index == active,
        })
        .collect()
}

/// Sliding underline under the active link, relative to the nav bar.
///
/// Hidden on the home section and whenever the bar or the link has not been
/// measured yet.
pub fn underline(active: usize, nav: &NavGeometry) -> UnderlineGeometry {
    if active == 0 {
        return UnderlineGeometry::HIDDEN;
    }
    let (Some(bar), Some(Some(link))) = (nav.bar, nav.links.get(active)) else {
        return UnderlineGeometry::HIDDEN;
    };
    if !link.w.is_finite() || link.w <= 0.0 {
        return UnderlineGeometry::HIDDEN;
    }
    UnderlineGeometry {
        left: link.x - bar.x,
        width: link.w,
    }
}

#[cfg(test)]
mod tests {
    use panscroll_protocol::Rect;

    use super::*;

    fn nav() -> NavGeometry {
        NavGeometry {
            bar: Some(Rect::new(200.0, 10.0, 600.0, 40.0)),
            links: vec![
                None,
                Some(Rect::new(220.0, 10.0, 80.0, 40.0)),
                Some(Rect::new(320.0, 10.0, 110.0, 40.0)),
            ],
        }
    }

    #[test]
    fn underline_is_relative_to_bar() {
        assert_eq!(
            underline(2, &nav()),
            UnderlineGeometry {
                left: 120.0,
                width: 110.0
            }
        );
    }

    #[test]
    fn hidden_on_home_and_unmeasured() {
        assert_eq!(underline(0, &nav()), UnderlineGeometry::HIDDEN);
        assert_eq!(underline(5, &nav()), UnderlineGeometry::HIDDEN);
        let no_bar = NavGeometry {
            bar: None,
            ..nav()
        };
        assert_eq!(underline(1, &no_bar), UnderlineGeometry::HIDDEN);
    }

    #[test]
    fn links_skip_home() {
        let sections = SectionList::from_entries([
            ("00", "Home", "Home"),
            ("01", "About", "About Us"),
            ("02", "Drink Bars", "Services"),
        ]);
        let links = header_links(&sections, 2);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].label, "About");
        assert!(!links[0].active);
        assert!(links[1].active);
    }
}
