use image::{DynamicImage, GrayImage, RgbImage};

/// A decoded photo in canonical 8-bit form, either single-channel or RGB.
///
/// Width and height are always non-zero; the decoding path rejects empty images.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelGrid {
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl PixelGrid {
    pub fn width(&self) -> u32 {
        match self {
            Self::Gray(image) => image.width(),
            Self::Rgb(image) => image.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Gray(image) => image.height(),
            Self::Rgb(image) => image.height(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn channels(&self) -> u8 {
        match self {
            Self::Gray(_) => 1,
            Self::Rgb(_) => 3,
        }
    }

    /// RGB view of the grid, replicating luminance for grayscale input.
    pub fn to_rgb(&self) -> RgbImage {
        match self {
            Self::Gray(image) => DynamicImage::ImageLuma8(image.clone()).to_rgb8(),
            Self::Rgb(image) => image.clone(),
        }
    }
}

impl From<GrayImage> for PixelGrid {
    fn from(image: GrayImage) -> Self {
        Self::Gray(image)
    }
}

impl From<RgbImage> for PixelGrid {
    fn from(image: RgbImage) -> Self {
        Self::Rgb(image)
    }
}
