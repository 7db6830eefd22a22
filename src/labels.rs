use std::collections::BTreeMap;

/// Class directory names and their collapsed labels.
/// 0 = no dementia, 1 = any stage of dementia.
pub const BINARY_CLASSES: [(&str, i32); 4] = [
    ("NonDemented", 0),
    ("VeryMildDemented", 1),
    ("MildDemented", 1),
    ("ModerateDemented", 1),
];

/// Maps class directory names to integer labels.
///
/// Directories whose name is not in the map are skipped by the loaders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabelMap {
    labels: BTreeMap<String, i32>,
}

impl ClassLabelMap {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        Self {
            labels: entries
                .into_iter()
                .map(|(name, label)| (name.into(), label))
                .collect(),
        }
    }

    /// The four-class to binary mapping used for the MRI dementia dataset.
    pub fn binary() -> Self {
        Self::new(BINARY_CLASSES)
    }

    pub fn get(&self, class_name: &str) -> Option<i32> {
        self.labels.get(class_name).copied()
    }
}

impl Default for ClassLabelMap {
    fn default() -> Self {
        Self::binary()
    }
}
