use super::types::PixelGrid;
use crate::config::DetectorConfig;
use crate::error::{DetectionError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use imageproc::filter::separable_filter_equal;

/// Turns raw photo bytes into pixel grids and pixel grids into
/// comparison-ready grayscale images.
#[derive(Debug, Clone)]
pub struct Normalizer {
    target_width: u32,
    target_height: u32,
    filter: FilterType,
    blur_kernel: Vec<f32>,
}

impl Normalizer {
    /// `blur_kernel_size` taps of a Gaussian with sigma `blur_sigma`, applied
    /// along both axes.
    pub fn new(
        target_width: u32,
        target_height: u32,
        filter: FilterType,
        blur_kernel_size: u32,
        blur_sigma: f32,
    ) -> Self {
        Self {
            target_width,
            target_height,
            filter,
            blur_kernel: gaussian_kernel(blur_kernel_size, blur_sigma),
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(
            config.comparison_width,
            config.comparison_height,
            config.resize_filter.into(),
            config.blur_kernel_size,
            config.blur_sigma(),
        )
    }

    pub fn target_size(&self) -> (u32, u32) {
        (self.target_width, self.target_height)
    }

    pub fn normalize(&self, bytes: &[u8]) -> Result<PixelGrid> {
        self.normalize_named(bytes, "input")
    }

    /// Decode an encoded image (format sniffed from its bytes).
    ///
    /// Alpha is dropped and deep images are reduced to 8 bits per sample.
    /// `name` only labels the error.
    pub fn normalize_named(&self, bytes: &[u8], name: &str) -> Result<PixelGrid> {
        let _span = tracing::debug_span!("normalize", input = name).entered();

        if bytes.is_empty() {
            return Err(DetectionError::decode(name, "empty buffer"));
        }

        let decoded =
            image::load_from_memory(bytes).map_err(|e| DetectionError::decode(name, e))?;
        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(DetectionError::decode(name, "image has no pixels"));
        }

        let grid = grid_from_dynamic(&decoded);
        tracing::debug!(
            "Decoded {} image: {}x{}, {} channel(s)",
            name,
            grid.width(),
            grid.height(),
            grid.channels()
        );
        Ok(grid)
    }

    /// Bring a grid to the comparison form.
    ///
    /// Steps:
    /// 1. Resize to the target resolution
    /// 2. Convert RGB to luminance (Rec. 601 weights)
    /// 3. Gaussian smoothing
    pub fn to_comparable(&self, grid: &PixelGrid) -> GrayImage {
        let _span = tracing::debug_span!("to_comparable").entered();

        let gray = match grid {
            PixelGrid::Gray(image) => self.resize(image),
            PixelGrid::Rgb(image) => rgb_to_luma(&self.resize(image)),
        };

        separable_filter_equal(&gray, &self.blur_kernel)
    }

    fn resize<P>(&self, image: &image::ImageBuffer<P, Vec<u8>>) -> image::ImageBuffer<P, Vec<u8>>
    where
        P: image::Pixel<Subpixel = u8> + 'static,
    {
        if image.dimensions() == (self.target_width, self.target_height) {
            image.clone()
        } else {
            imageops::resize(image, self.target_width, self.target_height, self.filter)
        }
    }
}

/// Luma plane of an RGB image, Y = 0.299 R + 0.587 G + 0.114 B.
fn rgb_to_luma(image: &RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let pixel = image.get_pixel(x, y);
        let r = pixel[0] as f32;
        let g = pixel[1] as f32;
        let b = pixel[2] as f32;
        let luma = (0.299 * r + 0.587 * g + 0.114 * b).round().clamp(0.0, 255.0) as u8;
        Luma([luma])
    })
}

/// Normalized 1-D Gaussian weights with exactly `size` taps.
fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let center = (size as f32 - 1.0) / 2.0;
    let weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Canonical grid for an already decoded image.
pub fn grid_from_dynamic(image: &DynamicImage) -> PixelGrid {
    if image.color().has_color() {
        PixelGrid::Rgb(image.to_rgb8())
    } else {
        PixelGrid::Gray(image.to_luma8())
    }
}
