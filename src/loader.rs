//! Eager loading of a labeled class-folder tree into stacked arrays.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use burn::tensor::TensorData;
use ndarray::{Array1, Array2, Array3, Axis};
use rayon::prelude::*;

use crate::error::{DatasetError, DatasetResult};
use crate::labels::ClassLabelMap;
use crate::listing::{self, IMAGE_EXTENSION};
use crate::preprocess::{self, PreprocessOptions, DEFAULT_TARGET_SIZE};

pub const DEFAULT_DATA_ROOT: &str = "data/raw";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    pub use_autocontrast: bool,
    pub normalize: bool,
    /// Maximum samples taken from each class, first by file name. `None` takes all.
    pub limit_per_class: Option<usize>,
    /// Resize target as (width, height). `None` keeps decoded sizes, which only
    /// stacks if every image already has the same shape.
    pub target_size: Option<(u32, u32)>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            use_autocontrast: true,
            normalize: true,
            limit_per_class: None,
            target_size: Some(DEFAULT_TARGET_SIZE),
        }
    }
}

impl LoaderConfig {
    pub fn with_autocontrast(mut self, yes: bool) -> Self {
        self.use_autocontrast = yes;
        self
    }

    pub fn with_normalize(mut self, yes: bool) -> Self {
        self.normalize = yes;
        self
    }

    pub fn with_limit_per_class(mut self, limit: Option<usize>) -> Self {
        self.limit_per_class = limit;
        self
    }

    pub fn with_target_size(mut self, size: Option<(u32, u32)>) -> Self {
        self.target_size = size;
        self
    }

    pub fn preprocess_options(&self) -> PreprocessOptions {
        PreprocessOptions {
            use_autocontrast: self.use_autocontrast,
            normalize: self.normalize,
            target_size: self.target_size,
        }
    }
}

/// Index-aligned output of [`DatasetLoader::load`].
///
/// `x[i]`, `y[i]` and `class_names[i]` describe the same source image.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    /// `(N, H, W)` image stack.
    pub x: Array3<f32>,
    /// Binary label per image.
    pub y: Array1<i32>,
    /// Original class directory name per image.
    pub class_names: Vec<String>,
}

impl LoadedDataset {
    /// `(height, width)` shared by every image.
    pub fn image_shape(&self) -> (usize, usize) {
        let (_, h, w) = self.x.dim();
        (h, w)
    }

    /// Number of samples per label value.
    pub fn label_counts(&self) -> BTreeMap<i32, usize> {
        let mut counts = BTreeMap::new();
        for &label in self.y.iter() {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    /// Number of samples per original class name.
    pub fn class_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for name in &self.class_names {
            *counts.entry(name.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Copy the arrays into Burn tensor data: images `[N, H, W]`, labels `[N]`.
    pub fn to_tensor_data(&self) -> (TensorData, TensorData) {
        let (n, h, w) = self.x.dim();
        let images: Vec<f32> = self.x.iter().copied().collect();
        let labels: Vec<i32> = self.y.to_vec();
        (
            TensorData::new(images, [n, h, w]),
            TensorData::new(labels, [n]),
        )
    }
}

/// One file scheduled for preprocessing.
pub(crate) struct PlannedSample {
    pub(crate) path: PathBuf,
    pub(crate) label: i32,
    pub(crate) class_name: String,
}

/// Per-class outcome of planning.
pub(crate) struct ClassSummary {
    pub(crate) class_name: String,
    pub(crate) label: i32,
    pub(crate) count: usize,
}

/// Sorted list of files to load, with unknown classes dropped and limits applied.
pub(crate) fn plan_samples(
    root: &Path,
    labels: &ClassLabelMap,
    limit_per_class: Option<usize>,
) -> DatasetResult<(Vec<PlannedSample>, Vec<ClassSummary>)> {
    let mut plan = Vec::new();
    let mut summaries = Vec::new();
    for (class_name, class_dir) in listing::list_subdirectories(root)? {
        let Some(label) = labels.get(&class_name) else {
            tracing::warn!("class '{class_name}' has no label mapping, skipping");
            continue;
        };

        let files = listing::list_files(&class_dir, IMAGE_EXTENSION)?;
        let mut count = 0usize;
        for path in files
            .into_iter()
            .take(limit_per_class.unwrap_or(usize::MAX))
        {
            plan.push(PlannedSample {
                path,
                label,
                class_name: class_name.clone(),
            });
            count += 1;
        }
        summaries.push(ClassSummary {
            class_name,
            label,
            count,
        });
    }
    Ok((plan, summaries))
}

/// Walks `root/<class>/*.jpg`, labels every known class and stacks the results.
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    labels: ClassLabelMap,
    config: LoaderConfig,
}

impl DatasetLoader {
    pub fn new(labels: ClassLabelMap, config: LoaderConfig) -> Self {
        Self { labels, config }
    }

    pub fn load<P: AsRef<Path>>(&self, root: P) -> DatasetResult<LoadedDataset> {
        let root = root.as_ref();
        let (plan, summaries) = plan_samples(root, &self.labels, self.config.limit_per_class)?;

        let options = self.config.preprocess_options();
        let processed: Vec<DatasetResult<Array2<f32>>> = plan
            .par_iter()
            .map(|sample| {
                tracing::debug!("preprocessing {}", sample.path.display());
                preprocess::preprocess_image(&sample.path, &options)
            })
            .collect();

        let mut images = Vec::with_capacity(plan.len());
        let mut labels = Vec::with_capacity(plan.len());
        let mut class_names = Vec::with_capacity(plan.len());
        for (sample, result) in plan.into_iter().zip(processed) {
            // First failure in sorted order wins, regardless of thread scheduling.
            images.push(result?);
            labels.push(sample.label);
            class_names.push(sample.class_name);
        }

        if images.is_empty() {
            return Err(DatasetError::EmptyDataset {
                root: root.to_path_buf(),
            });
        }
        let x = stack_images(&images)?;
        let y = Array1::from_vec(labels);

        for s in &summaries {
            tracing::info!(
                "loaded {} images from class '{}' (label={})",
                s.count,
                s.class_name,
                s.label
            );
        }

        tracing::info!("final dataset shape: {:?}", x.shape());
        tracing::info!("label vector shape: {:?}", y.shape());

        Ok(LoadedDataset { x, y, class_names })
    }
}

/// Load `root` with the binary dementia label map and the default target size.
pub fn load_dataset<P: AsRef<Path>>(
    root: P,
    use_autocontrast: bool,
    normalize: bool,
    limit_per_class: Option<usize>,
) -> DatasetResult<LoadedDataset> {
    let config = LoaderConfig::default()
        .with_autocontrast(use_autocontrast)
        .with_normalize(normalize)
        .with_limit_per_class(limit_per_class);
    DatasetLoader::new(ClassLabelMap::binary(), config).load(root)
}

/// Stack `(H, W)` images into one `(N, H, W)` array.
///
/// Every image must have the shape of the first one.
pub fn stack_images(images: &[Array2<f32>]) -> DatasetResult<Array3<f32>> {
    let Some(first) = images.first() else {
        return Err(DatasetError::EmptyDataset {
            root: PathBuf::new(),
        });
    };
    let expected = first.dim();
    if let Some((index, img)) = images
        .iter()
        .enumerate()
        .find(|(_, img)| img.dim() != expected)
    {
        return Err(DatasetError::ShapeMismatch {
            index,
            expected,
            found: img.dim(),
        });
    }

    let (h, w) = expected;
    let mut x = Array3::<f32>::zeros((images.len(), h, w));
    for (mut slot, img) in x.axis_iter_mut(Axis(0)).zip(images) {
        slot.assign(img);
    }
    Ok(x)
}
