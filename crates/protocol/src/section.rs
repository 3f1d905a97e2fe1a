use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;

/// One full-viewport section of the page.
///
/// `index` is the section's position in the page order, which is both the
/// navigation order and the left-to-right order when panned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDescriptor {
    pub index: usize,
    /// Short code shown in the indicator, e.g. `"02"`.
    pub code: SharedStr,
    pub label: SharedStr,
    pub display_name: SharedStr,
}

impl SectionDescriptor {
    pub fn new(
        index: usize,
        code: impl Into<SharedStr>,
        label: impl Into<SharedStr>,
        display_name: impl Into<SharedStr>,
    ) -> Self {
        Self {
            index,
            code: code.into(),
            label: label.into(),
            display_name: display_name.into(),
        }
    }
}
