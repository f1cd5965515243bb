use super::types::Difference;
use crate::error::{DetectionError, Result};
use image::{GrayImage, Luma};
use ndarray::{s, Array2, Axis, Zip};

const DATA_RANGE: f64 = 255.0;
const K1: f64 = 0.01;
const K2: f64 = 0.03;

/// Structural similarity between two same-size grayscale grids.
#[derive(Debug, Clone, Copy)]
pub struct DifferenceEngine {
    window: usize,
}

impl DifferenceEngine {
    /// `window` is the side of the square averaging window; it must be odd.
    pub fn new(window: u32) -> Self {
        Self {
            window: window as usize,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Compare two grids and return the mean similarity and the dissimilarity map.
    pub fn diff(&self, before: &GrayImage, after: &GrayImage) -> Result<Difference> {
        let _span = tracing::debug_span!("ssim").entered();

        if before.dimensions() != after.dimensions() {
            return Err(DetectionError::ShapeMismatch {
                left: before.dimensions(),
                right: after.dimensions(),
            });
        }
        let (width, height) = before.dimensions();
        if (width as usize) < self.window || (height as usize) < self.window {
            return Err(DetectionError::Processing(format!(
                "{width}x{height} grid is smaller than the {0}x{0} similarity window",
                self.window
            )));
        }

        let map = self.similarity_map(&to_plane(before), &to_plane(after));

        let pad = self.window / 2;
        let (rows, cols) = map.dim();
        let similarity_score = map
            .slice(s![pad..rows - pad, pad..cols - pad])
            .mean()
            .ok_or_else(|| DetectionError::Processing("empty similarity map".into()))?;

        let diff_map = GrayImage::from_fn(width, height, |x, y| {
            Luma([dissimilarity_level(map[[y as usize, x as usize]])])
        });

        tracing::debug!(
            "Similarity {:.4} over {}x{} with window {}",
            similarity_score,
            width,
            height,
            self.window
        );

        Ok(Difference {
            similarity_score,
            diff_map,
        })
    }

    /// Per-pixel SSIM with uniform windows and sample-covariance normalization.
    fn similarity_map(&self, x: &Array2<f64>, y: &Array2<f64>) -> Array2<f64> {
        let mean_x = uniform_filter(x, self.window);
        let mean_y = uniform_filter(y, self.window);
        let mean_xx = uniform_filter(&(x * x), self.window);
        let mean_yy = uniform_filter(&(y * y), self.window);
        let mean_xy = uniform_filter(&(x * y), self.window);

        let samples = (self.window * self.window) as f64;
        let cov_norm = samples / (samples - 1.0);
        let c1 = (K1 * DATA_RANGE).powi(2);
        let c2 = (K2 * DATA_RANGE).powi(2);

        let mut map = Array2::<f64>::zeros(x.raw_dim());
        Zip::from(&mut map)
            .and(&mean_x)
            .and(&mean_y)
            .and(&mean_xx)
            .and(&mean_yy)
            .and(&mean_xy)
            .for_each(|out, &mx, &my, &mxx, &myy, &mxy| {
                let var_x = cov_norm * (mxx - mx * mx);
                let var_y = cov_norm * (myy - my * my);
                let cov = cov_norm * (mxy - mx * my);

                let numerator = (2.0 * mx * my + c1) * (2.0 * cov + c2);
                let denominator = (mx * mx + my * my + c1) * (var_x + var_y + c2);
                *out = numerator / denominator;
            });
        map
    }
}

fn to_plane(image: &GrayImage) -> Array2<f64> {
    let (width, height) = image.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
        image.get_pixel(col as u32, row as u32)[0] as f64
    })
}

/// Map similarity in [-1, 1] to [0, 255], low similarity becoming bright.
fn dissimilarity_level(similarity: f64) -> u8 {
    let s = similarity.clamp(-1.0, 1.0);
    ((1.0 - s) * 0.5 * 255.0).round() as u8
}

/// Separable box mean with mirrored borders (`d c b a | a b c d | d c b a`).
fn uniform_filter(plane: &Array2<f64>, size: usize) -> Array2<f64> {
    let rows = filter_axis(plane, size, Axis(1));
    filter_axis(&rows, size, Axis(0))
}

fn filter_axis(plane: &Array2<f64>, size: usize, axis: Axis) -> Array2<f64> {
    let radius = (size / 2) as isize;
    let len = plane.len_of(axis);
    let mut out = Array2::<f64>::zeros(plane.raw_dim());

    for (src, mut dst) in plane.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        for i in 0..len {
            let mut acc = 0.0;
            for k in -radius..=radius {
                acc += src[mirror(i as isize + k, len)];
            }
            dst[i] = acc / size as f64;
        }
    }
    out
}

fn mirror(index: isize, len: usize) -> usize {
    let len = len as isize;
    let mut i = index;
    while i < 0 || i >= len {
        if i < 0 {
            i = -i - 1;
        } else {
            i = 2 * len - i - 1;
        }
    }
    i as usize
}
