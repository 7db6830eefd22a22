use burn::data::dataset::Dataset;
use std::path::{Path, PathBuf};

use crate::error::DatasetResult;
use crate::labels::ClassLabelMap;
use crate::loader::plan_samples;
use crate::preprocess::{preprocess_image, PreprocessOptions};

#[derive(Clone, Debug, PartialEq)]
pub struct MriItem {
    /// Row-major `height * width` pixels.
    pub image: Vec<f32>,
    pub height: usize,
    pub width: usize,
    pub label: i32,
    pub class_name: String,
}

/// Lazily preprocessed view over a class-folder tree.
///
/// Only paths and labels are kept in memory; each `get` decodes one file.
/// Item order is the same as the eager loader's.
pub struct MriFolderDataset {
    items: Vec<(PathBuf, i32, String)>,
    options: PreprocessOptions,
}

impl MriFolderDataset {
    pub fn new<P: AsRef<Path>>(
        root: P,
        labels: &ClassLabelMap,
        options: PreprocessOptions,
    ) -> DatasetResult<Self> {
        Self::with_limit(root, labels, options, None)
    }

    pub fn with_limit<P: AsRef<Path>>(
        root: P,
        labels: &ClassLabelMap,
        options: PreprocessOptions,
        limit_per_class: Option<usize>,
    ) -> DatasetResult<Self> {
        let (plan, summaries) = plan_samples(root.as_ref(), labels, limit_per_class)?;

        for s in &summaries {
            tracing::info!(
                "found {} images in class '{}' (label={})",
                s.count,
                s.class_name,
                s.label
            );
        }

        let items = plan
            .into_iter()
            .map(|s| (s.path, s.label, s.class_name))
            .collect();

        Ok(Self { items, options })
    }

    pub fn path_of(&self, index: usize) -> Option<&Path> {
        self.items.get(index).map(|(p, _, _)| p.as_path())
    }

    pub fn label_of(&self, index: usize) -> Option<i32> {
        self.items.get(index).map(|(_, l, _)| *l)
    }
}

impl Dataset<MriItem> for MriFolderDataset {
    fn get(&self, index: usize) -> Option<MriItem> {
        let (path, label, class_name) = self.items.get(index)?;

        let array = match preprocess_image(path, &self.options) {
            Ok(array) => array,
            Err(e) => {
                tracing::error!("failed to load {}: {e}", path.display());
                return None;
            }
        };
        let (height, width) = array.dim();

        Some(MriItem {
            image: array.iter().copied().collect(),
            height,
            width,
            label: *label,
            class_name: class_name.clone(),
        })
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
