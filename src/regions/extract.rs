use super::types::{Bounds, Region};
use crate::difference::ChangeMask;
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::HashSet;

/// Finds outer-bordered regions in a change mask and drops the noise-sized ones.
#[derive(Debug, Clone, Copy)]
pub struct RegionExtractor {
    min_area: u32,
}

impl RegionExtractor {
    /// Regions enclosing fewer than `min_area` pixels are discarded;
    /// a region of exactly `min_area` pixels is kept.
    pub fn new(min_area: u32) -> Self {
        Self { min_area }
    }

    pub fn min_area(&self) -> u32 {
        self.min_area
    }

    pub fn extract(&self, mask: &ChangeMask) -> Vec<Region> {
        let _span = tracing::debug_span!("extract_regions").entered();

        let traced = trace_regions(mask);
        let total = traced.len();
        let kept: Vec<Region> = traced
            .into_iter()
            .filter(|region| region.area >= self.min_area)
            .collect();

        tracing::debug!(
            "Kept {} of {} regions (min area {} px)",
            kept.len(),
            total,
            self.min_area
        );
        kept
    }
}

/// Every top-level region of the mask in scan order of its first border pixel.
///
/// Blobs are 8-connected. Holes inside a blob, and anything nested inside
/// those holes, belong to the enclosing region and are not reported.
pub fn trace_regions(mask: &ChangeMask) -> Vec<Region> {
    let image = mask.as_image();

    let filled = fill_holes(image);
    let labels = connected_components(&filled, Connectivity::Eight, Luma([0u8]));
    let max_label = labels.pixels().map(|p| p[0]).max().unwrap_or(0) as usize;
    let mut areas = vec![0u32; max_label + 1];
    for pixel in labels.pixels() {
        areas[pixel[0] as usize] += 1;
    }

    find_contours::<u32>(&pad(image))
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
        .filter_map(|contour| {
            let points: Vec<Point<u32>> = contour
                .points
                .iter()
                .map(|p| Point::new(p.x - 1, p.y - 1))
                .collect();
            let start = points.first()?;
            let label = labels.get_pixel(start.x, start.y)[0] as usize;
            Some(Region::new(
                areas[label],
                closed_length(&points),
                bounds_of(&points)?,
            ))
        })
        .collect()
}

/// Copy of the mask inside a one-pixel unchanged frame.
///
/// The border follower only opens an outer border after an unchanged pixel,
/// so blobs touching column 0 would otherwise be traced as holes.
fn pad(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    let mut padded = GrayImage::new(width + 2, height + 2);
    for (x, y, pixel) in mask.enumerate_pixels() {
        padded.put_pixel(x + 1, y + 1, *pixel);
    }
    padded
}

/// Mark every pixel that is changed or enclosed by changed pixels.
///
/// Unchanged pixels 4-connected to the image edge are outside; the rest are holes.
fn fill_holes(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    let unchanged = GrayImage::from_fn(width, height, |x, y| {
        Luma([if mask.get_pixel(x, y)[0] == 0 { 255 } else { 0 }])
    });
    let labels = connected_components(&unchanged, Connectivity::Four, Luma([0u8]));

    let mut outside = HashSet::new();
    for x in 0..width {
        outside.insert(labels.get_pixel(x, 0)[0]);
        outside.insert(labels.get_pixel(x, height - 1)[0]);
    }
    for y in 0..height {
        outside.insert(labels.get_pixel(0, y)[0]);
        outside.insert(labels.get_pixel(width - 1, y)[0]);
    }
    outside.remove(&0);

    GrayImage::from_fn(width, height, |x, y| {
        let label = labels.get_pixel(x, y)[0];
        Luma([if outside.contains(&label) { 0 } else { 255 }])
    })
}

fn closed_length(points: &[Point<u32>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| {
            let dx = a.x as f64 - b.x as f64;
            let dy = a.y as f64 - b.y as f64;
            (dx * dx + dy * dy).sqrt()
        })
        .sum()
}

fn bounds_of(points: &[Point<u32>]) -> Option<Bounds> {
    let min_x = points.iter().map(|p| p.x).min()?;
    let max_x = points.iter().map(|p| p.x).max()?;
    let min_y = points.iter().map(|p| p.y).min()?;
    let max_y = points.iter().map(|p| p.y).max()?;
    Some(Bounds {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}
