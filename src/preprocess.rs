use std::path::Path;

use image::GrayImage;
use ndarray::Array2;

use crate::codec;
use crate::error::DatasetResult;

/// (width, height) every image is resampled to by default.
pub const DEFAULT_TARGET_SIZE: (u32, u32) = (176, 208);

const NORMALIZE_EPSILON: f32 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessOptions {
    pub use_autocontrast: bool,
    /// Min-max scale the output into [0, 1].
    pub normalize: bool,
    /// Resize target as (width, height); `None` keeps the decoded size.
    pub target_size: Option<(u32, u32)>,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            use_autocontrast: true,
            normalize: true,
            target_size: Some(DEFAULT_TARGET_SIZE),
        }
    }
}

/// Decode `path` and run the grayscale pipeline on it.
///
/// Returns a `(height, width)` array. Fails only if the file cannot be decoded.
pub fn preprocess_image<P: AsRef<Path>>(
    path: P,
    options: &PreprocessOptions,
) -> DatasetResult<Array2<f32>> {
    let img = codec::decode_grayscale(path.as_ref())?;
    Ok(preprocess_luma(img, options))
}

/// Autocontrast, resize, array conversion and normalization on an already decoded image.
pub fn preprocess_luma(img: GrayImage, options: &PreprocessOptions) -> Array2<f32> {
    let img = if options.use_autocontrast {
        codec::autocontrast(&img)
    } else {
        img
    };

    let img = match options.target_size {
        Some((width, height)) => codec::resize_bilinear(&img, width, height),
        None => img,
    };

    let mut array = codec::to_array(&img);
    if options.normalize {
        normalize_min_max(&mut array);
    }
    array
}

/// `(x - min) / (max - min + 1e-8)` in place. Constant arrays become all zeros.
pub fn normalize_min_max(array: &mut Array2<f32>) {
    if array.is_empty() {
        return;
    }
    let min = array.fold(f32::INFINITY, |acc, &v| acc.min(v));
    let max = array.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
    let denom = max - min + NORMALIZE_EPSILON;
    array.mapv_inplace(|v| (v - min) / denom);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn gradient(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([((x * 7 + y * 3) % 200 + 20) as u8]))
    }

    #[test]
    fn default_options_match_mri_pipeline() {
        let opts = PreprocessOptions::default();
        assert!(opts.use_autocontrast);
        assert!(opts.normalize);
        assert_eq!(opts.target_size, Some((176, 208)));
    }

    #[test]
    fn output_shape_is_height_by_width() {
        let out = preprocess_luma(gradient(50, 40), &PreprocessOptions::default());
        assert_eq!(out.dim(), (208, 176));
    }

    #[test]
    fn no_resize_keeps_decoded_shape() {
        let opts = PreprocessOptions {
            target_size: None,
            ..Default::default()
        };
        let out = preprocess_luma(gradient(50, 40), &opts);
        assert_eq!(out.dim(), (40, 50));
    }

    #[test]
    fn normalized_values_stay_in_unit_range() {
        let out = preprocess_luma(gradient(64, 64), &PreprocessOptions::default());
        assert!(out.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert_eq!(out.fold(f32::INFINITY, |a, &v| a.min(v)), 0.0);
    }

    #[test]
    fn constant_image_normalizes_to_zeros() {
        let img = GrayImage::from_pixel(30, 20, Luma([128]));
        let out = preprocess_luma(img, &PreprocessOptions::default());
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn raw_values_pass_through_without_normalize() {
        let img = gradient(8, 6);
        let opts = PreprocessOptions {
            use_autocontrast: false,
            normalize: false,
            target_size: None,
        };
        let out = preprocess_luma(img.clone(), &opts);
        for (x, y, px) in img.enumerate_pixels() {
            assert_eq!(out[[y as usize, x as usize]], px[0] as f32);
        }
    }

    #[test]
    fn autocontrast_without_normalize_spans_full_range() {
        let opts = PreprocessOptions {
            use_autocontrast: true,
            normalize: false,
            target_size: None,
        };
        let out = preprocess_luma(gradient(64, 64), &opts);
        assert_eq!(out.fold(f32::INFINITY, |a, &v| a.min(v)), 0.0);
        assert_eq!(out.fold(f32::NEG_INFINITY, |a, &v| a.max(v)), 255.0);
    }

    #[test]
    fn identical_inputs_give_identical_outputs() {
        let opts = PreprocessOptions::default();
        let a = preprocess_luma(gradient(90, 70), &opts);
        let b = preprocess_luma(gradient(90, 70), &opts);
        assert_eq!(a, b);
    }
}
