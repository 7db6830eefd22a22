//! Loads a `root/<class>/*.jpg` tree of grayscale MRI slices into a binary
//! classification dataset.
//!
//! Every image is decoded to grayscale, optionally autocontrasted, resized to
//! a fixed (width, height) and optionally min-max normalized. Class names are
//! collapsed to 0/1 labels through a [`ClassLabelMap`]; directories missing
//! from the map are skipped.

pub mod codec;
pub mod dataset;
pub mod error;
pub mod labels;
pub mod listing;
pub mod loader;
pub mod preprocess;

pub use dataset::{MriFolderDataset, MriItem};
pub use error::{DatasetError, DatasetResult};
pub use labels::{ClassLabelMap, BINARY_CLASSES};
pub use listing::{list_image_paths, IMAGE_EXTENSION};
pub use loader::{
    load_dataset, stack_images, DatasetLoader, LoadedDataset, LoaderConfig,
    DEFAULT_DATA_ROOT,
};
pub use preprocess::{
    normalize_min_max, preprocess_image, preprocess_luma, PreprocessOptions, DEFAULT_TARGET_SIZE,
};
