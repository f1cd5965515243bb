use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use std::io::Cursor;

pub const BACKGROUND: u8 = 100;
pub const MARK: u8 = 220;

/// Uniform gray canvas.
pub fn solid_gray(width: u32, height: u32, value: u8) -> GrayImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    GrayImage::from_pixel(width, height, Luma([value]))
}

/// Copy of `base` with a filled disc.
pub fn with_disc(base: &GrayImage, center: (i32, i32), radius: i32, value: u8) -> GrayImage {
    let mut image = base.clone();
    draw_filled_circle_mut(&mut image, center, radius, Luma([value]));
    image
}

/// Copy of `base` with a filled axis-aligned rectangle.
pub fn with_rect(base: &GrayImage, x: i32, y: i32, width: u32, height: u32, value: u8) -> GrayImage {
    let mut image = base.clone();
    draw_filled_rect_mut(&mut image, Rect::at(x, y).of_size(width, height), Luma([value]));
    image
}

/// Smooth texture so that similarity windows see real structure.
pub fn textured(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let fx = x as f32 / 9.0;
        let fy = y as f32 / 13.0;
        let v = 128.0 + 60.0 * fx.sin() * fy.cos() + 30.0 * ((x + y) as f32 / 21.0).sin();
        Luma([v.clamp(0.0, 255.0) as u8])
    })
}

/// Colour photo stand-in: a gradient sky over a flat body panel.
pub fn rgb_scene(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if y < height / 3 {
            Rgb([90, 140, (150 + (x % 100)) as u8])
        } else {
            Rgb([170, 30, 40])
        }
    })
}

pub fn png_bytes(image: DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("PNG encoding of a synthetic image");
    bytes
}

pub fn gray_png(image: &GrayImage) -> Vec<u8> {
    png_bytes(DynamicImage::ImageLuma8(image.clone()))
}
