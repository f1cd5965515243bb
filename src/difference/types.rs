use image::{GrayImage, Luma};

pub const CHANGED: u8 = 255;
pub const UNCHANGED: u8 = 0;

/// Binary per-pixel change decision, same size as the compared grids.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeMask(GrayImage);

impl ChangeMask {
    /// Build a mask from any grayscale image; every non-zero sample counts as changed.
    pub fn from_image(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self(GrayImage::from_fn(width, height, |x, y| {
            if image.get_pixel(x, y)[0] != 0 {
                Luma([CHANGED])
            } else {
                Luma([UNCHANGED])
            }
        }))
    }

    pub fn empty(width: u32, height: u32) -> Self {
        Self(GrayImage::new(width, height))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn is_changed(&self, x: u32, y: u32) -> bool {
        self.0.get_pixel(x, y)[0] == CHANGED
    }

    pub fn changed_pixels(&self) -> usize {
        self.0.pixels().filter(|p| p[0] == CHANGED).count()
    }

    pub fn is_empty(&self) -> bool {
        self.changed_pixels() == 0
    }

    /// The mask as a 0/255 image.
    pub fn as_image(&self) -> &GrayImage {
        &self.0
    }
}

/// Result of comparing two comparison-ready grids.
#[derive(Debug, Clone)]
pub struct Difference {
    /// Mean structural similarity over all fully-covered windows, in [-1, 1].
    pub similarity_score: f64,
    /// Per-pixel dissimilarity scaled to [0, 255]; brighter means less similar.
    pub diff_map: GrayImage,
}
