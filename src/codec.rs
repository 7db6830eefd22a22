//! Grayscale image primitives on top of the `image` crate.

use std::path::Path;

use image::imageops::FilterType;
use image::{GrayImage, Luma, RgbImage};
use ndarray::Array2;

use crate::error::{DatasetError, DatasetResult};

/// Open an image file and convert it to 8-bit luma.
///
/// Color inputs go through [`rgb_to_luma`]; single-channel inputs are kept as is.
pub fn decode_grayscale(path: &Path) -> DatasetResult<GrayImage> {
    let img = image::open(path).map_err(|e| DatasetError::Decode {
        path: path.to_path_buf(),
        source: e,
    })?;
    if img.color().has_color() {
        Ok(rgb_to_luma(&img.to_rgb8()))
    } else {
        Ok(img.to_luma8())
    }
}

/// ITU-R 601-2 luma (299/587/114) in 16-bit fixed point, rounded to nearest.
pub fn rgb_to_luma(img: &RgbImage) -> GrayImage {
    let (width, height) = img.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let [r, g, b] = img.get_pixel(x, y).0;
        let l = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
        Luma([l as u8])
    })
}

/// Stretch the histogram so the darkest pixel becomes 0 and the brightest 255.
///
/// Images with a single intensity are returned unchanged.
pub fn autocontrast(img: &GrayImage) -> GrayImage {
    let mut histogram = [0u64; 256];
    for px in img.pixels() {
        histogram[px[0] as usize] += 1;
    }

    let lo = histogram.iter().position(|&n| n > 0);
    let hi = histogram.iter().rposition(|&n| n > 0);
    let (lo, hi) = match (lo, hi) {
        (Some(lo), Some(hi)) if hi > lo => (lo, hi),
        _ => return img.clone(),
    };

    // Integer form of trunc(v * 255 / (hi - lo) - lo * 255 / (hi - lo)) keeps both ends exact.
    let mut lut = [0u8; 256];
    for (v, slot) in lut.iter_mut().enumerate() {
        *slot = if v <= lo {
            0
        } else if v >= hi {
            255
        } else {
            ((v - lo) * 255 / (hi - lo)) as u8
        };
    }

    let mut out = img.clone();
    for px in out.pixels_mut() {
        px[0] = lut[px[0] as usize];
    }
    out
}

/// Resample to exactly `width` x `height` with a bilinear (triangle) filter.
pub fn resize_bilinear(img: &GrayImage, width: u32, height: u32) -> GrayImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    image::imageops::resize(img, width, height, FilterType::Triangle)
}

/// Pixel data as a `(height, width)` float array.
pub fn to_array(img: &GrayImage) -> Array2<f32> {
    let (width, height) = img.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
        img.get_pixel(col as u32, row as u32)[0] as f32
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn ramp(width: u32, height: u32, lo: u8, hi: u8) -> GrayImage {
        let span = (hi - lo) as u32;
        GrayImage::from_fn(width, height, |x, _| {
            Luma([lo + (x * span / (width - 1).max(1)) as u8])
        })
    }

    #[test]
    fn autocontrast_stretches_to_full_range() {
        let img = ramp(16, 4, 60, 180);
        let out = autocontrast(&img);
        let min = out.pixels().map(|p| p[0]).min().unwrap();
        let max = out.pixels().map(|p| p[0]).max().unwrap();
        assert_eq!(min, 0);
        assert_eq!(max, 255);
    }

    #[test]
    fn autocontrast_keeps_constant_image() {
        let img = GrayImage::from_pixel(5, 5, Luma([77]));
        assert_eq!(autocontrast(&img), img);
    }

    #[test]
    fn autocontrast_preserves_order() {
        let img = ramp(32, 1, 10, 90);
        let out = autocontrast(&img);
        let values: Vec<u8> = out.pixels().map(|p| p[0]).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn resize_produces_requested_dimensions() {
        let img = ramp(40, 30, 0, 255);
        let out = resize_bilinear(&img, 17, 23);
        assert_eq!(out.dimensions(), (17, 23));
    }

    #[test]
    fn to_array_is_height_first() {
        let mut img = GrayImage::new(3, 2);
        img.put_pixel(2, 1, Luma([200]));
        let arr = to_array(&img);
        assert_eq!(arr.dim(), (2, 3));
        assert_eq!(arr[[1, 2]], 200.0);
        assert_eq!(arr[[0, 0]], 0.0);
    }

    #[test]
    fn rgb_uses_rec601_weights() {
        let mut img = RgbImage::new(5, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(2, 0, Rgb([0, 0, 255]));
        img.put_pixel(3, 0, Rgb([255, 255, 255]));
        img.put_pixel(4, 0, Rgb([90, 90, 90]));
        let gray = rgb_to_luma(&img);
        let values: Vec<u8> = gray.pixels().map(|p| p[0]).collect();
        assert_eq!(values, vec![76, 150, 29, 255, 90]);
    }

    #[test]
    fn decode_color_file_matches_l_conversion() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("red.png");
        RgbImage::from_pixel(2, 2, Rgb([255, 0, 0])).save(&path).unwrap();

        let gray = decode_grayscale(&path).unwrap();
        assert_eq!(gray.dimensions(), (2, 2));
        assert!(gray.pixels().all(|p| p[0] == 76));
    }

    #[test]
    fn decode_gray_file_keeps_intensities() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("gray.png");
        let img = GrayImage::from_fn(4, 3, |x, y| Luma([(x * 40 + y * 7) as u8]));
        img.save(&path).unwrap();

        assert_eq!(decode_grayscale(&path).unwrap(), img);
    }

    #[test]
    fn decode_missing_file_is_decode_error() {
        let err = decode_grayscale(Path::new("definitely/not/here.jpg")).unwrap_err();
        assert!(matches!(err, DatasetError::Decode { .. }));
    }
}
