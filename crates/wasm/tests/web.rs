//! Browser smoke tests.
//!
//! Run with: wasm-pack test --headless --chrome crates/wasm

use panscroll_wasm::PanScroll;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const SECTIONS: &str = r#"[
    {"code": "00", "label": "Home", "name": "Home"},
    {"code": "01", "label": "About", "name": "About Us"},
    {"code": "02", "label": "Drink Bars", "name": "Services"},
    {"code": "03", "label": "Events", "name": "Events"},
    {"code": "04", "label": "Contact Us", "name": "Contact"}
]"#;

const WIDE: &str = r#"{
    "viewport": {"width": 1000, "height": 800},
    "documentHeight": 800,
    "sectionExtents": [1000, 1000, 1000, 1000, 1000],
    "sectionTops": [0, 0, 0, 0, 0]
}"#;

fn engine() -> Option<PanScroll> {
    PanScroll::new(SECTIONS, Some(r#"{"breakpointPx": 960}"#.to_string())).ok()
}

#[wasm_bindgen_test]
fn version_is_set() {
    assert!(!panscroll_wasm::get_version().is_empty());
}

#[wasm_bindgen_test]
fn mount_returns_document_height() {
    let Some(mut engine) = engine() else {
        panic!("engine construction failed");
    };
    let json = engine.mount(WIDE, 0.0).ok().unwrap_or_default();
    assert!(json.contains(r#""type":"setDocumentHeight","height":4800.0"#));
    assert_eq!(engine.mode(), "panned");
}

#[wasm_bindgen_test]
fn scrolling_halfway_activates_the_middle_section() {
    let Some(mut engine) = engine() else {
        panic!("engine construction failed");
    };
    let _ = engine.mount(WIDE, 0.0);
    let json = engine.scroll(2000.0).ok().unwrap_or_default();
    assert!(json.contains(r#""type":"activeSectionChanged","index":2"#));
    assert_eq!(engine.active_index(), 2);
    assert!((engine.progress() - 0.5).abs() < f64::EPSILON);
}

#[wasm_bindgen_test]
fn bad_sections_are_rejected() {
    assert!(PanScroll::new("not json", None).is_err());
}
