use crate::classify::{DamageCategory, DamageFinding};
use crate::error::{DetectionError, Result};
use crate::normalize::PixelGrid;
use image::imageops::{self, FilterType};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::Path;

const DENT_COLOR: Rgb<u8> = Rgb([255, 64, 64]);
const SCRATCH_COLOR: Rgb<u8> = Rgb([255, 200, 0]);
const PAINT_COLOR: Rgb<u8> = Rgb([0, 200, 255]);

fn category_color(category: DamageCategory) -> Rgb<u8> {
    match category {
        DamageCategory::Dent => DENT_COLOR,
        DamageCategory::Scratch => SCRATCH_COLOR,
        DamageCategory::PaintDamage => PAINT_COLOR,
    }
}

/// Save a diff map or change mask as a grayscale PNG.
pub fn save_gray_png<P: AsRef<Path>>(image: &GrayImage, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    image
        .save(path)
        .map_err(|e| DetectionError::Output(format!("failed to save {}: {e}", path.display())))
}

pub fn save_rgb_png<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    image
        .save(path)
        .map_err(|e| DetectionError::Output(format!("failed to save {}: {e}", path.display())))
}

/// Draw each finding's bounding box on the photo at comparison resolution.
pub fn render_overlay(
    photo: &PixelGrid,
    size: (u32, u32),
    filter: FilterType,
    findings: &[DamageFinding],
) -> RgbImage {
    let rgb = photo.to_rgb();
    let mut canvas = if rgb.dimensions() != size {
        imageops::resize(&rgb, size.0, size.1, filter)
    } else {
        rgb
    };

    for finding in findings {
        let bounds = finding.region.bounds;
        let color = category_color(finding.category);
        let rect = Rect::at(bounds.x as i32, bounds.y as i32).of_size(bounds.width, bounds.height);
        draw_hollow_rect_mut(&mut canvas, rect, color);
        if bounds.width > 2 && bounds.height > 2 {
            let inner = Rect::at(bounds.x as i32 + 1, bounds.y as i32 + 1)
                .of_size(bounds.width - 2, bounds.height - 2);
            draw_hollow_rect_mut(&mut canvas, inner, color);
        }
    }
    canvas
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DetectionError::Output(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
    }
    Ok(())
}
