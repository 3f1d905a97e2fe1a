use panscroll_protocol::{SectionDescriptor, SharedStr};
use serde::Deserialize;

use crate::error::SectionError;

/// One JSON entry: either a full descriptor, or the short page-composition
/// form `{code, label, name}` whose index comes from its position.
#[derive(Deserialize)]
#[serde(untagged)]
enum SectionEntry {
    Full(SectionDescriptor),
    Short {
        code: SharedStr,
        label: SharedStr,
        name: SharedStr,
    },
}

/// Ordered, read-only section sequence.
///
/// Every descriptor's `index` equals its position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectionList {
    sections: Vec<SectionDescriptor>,
}

impl SectionList {
    pub fn new(sections: Vec<SectionDescriptor>) -> Result<Self, SectionError> {
        for (position, section) in sections.iter().enumerate() {
            if section.index != position {
                return Err(SectionError::IndexMismatch {
                    position,
                    index: section.index,
                });
            }
        }
        Ok(Self { sections })
    }

    /// Build from `(code, label, display name)` triples in page order.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: Into<SharedStr>,
    {
        let sections = entries
            .into_iter()
            .enumerate()
            .map(|(index, (code, label, name))| SectionDescriptor::new(index, code, label, name))
            .collect();
        Self { sections }
    }

    pub fn from_json(data: &str) -> Result<Self, SectionError> {
        let entries: Vec<SectionEntry> = serde_json::from_str(data)?;
        let sections = entries
            .into_iter()
            .enumerate()
            .map(|(position, entry)| match entry {
                SectionEntry::Full(descriptor) => descriptor,
                SectionEntry::Short { code, label, name } => SectionDescriptor {
                    index: position,
                    code,
                    label,
                    display_name: name,
                },
            })
            .collect();
        Self::new(sections)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SectionDescriptor> {
        self.sections.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SectionDescriptor> {
        self.sections.iter()
    }
}

impl<'a> IntoIterator for &'a SectionList {
    type Item = &'a SectionDescriptor;
    type IntoIter = std::slice::Iter<'a, SectionDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_entries_get_positional_indexes() {
        let list = SectionList::from_json(
            r#"[
                {"code": "00", "label": "Home", "name": "Home"},
                {"code": "01", "label": "About", "name": "About Us"}
            ]"#,
        )
        .unwrap_or_default();
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1).map(|s| s.index), Some(1));
        assert_eq!(list.get(1).map(|s| s.display_name.as_str()), Some("About Us"));
    }

    #[test]
    fn full_descriptors_are_validated() {
        let err = SectionList::from_json(
            r#"[{"index": 1, "code": "01", "label": "About", "displayName": "About Us"}]"#,
        );
        assert!(matches!(
            err,
            Err(SectionError::IndexMismatch {
                position: 0,
                index: 1
            })
        ));
    }
}
