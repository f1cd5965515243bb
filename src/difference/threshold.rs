use super::types::{ChangeMask, CHANGED, UNCHANGED};
use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;

/// Binarize a dissimilarity map with an Otsu threshold.
///
/// Pixels strictly above the level are marked changed. A flat map, whatever
/// its value, has nothing to separate and yields an empty mask.
pub fn change_mask(diff_map: &GrayImage) -> ChangeMask {
    let _span = tracing::debug_span!("change_mask").entered();
    let (width, height) = diff_map.dimensions();

    let mut values = diff_map.pixels().map(|p| p[0]);
    let first = values.next();
    if values.all(|v| Some(v) == first) {
        tracing::debug!("Diff map is flat at {:?}, no changed pixels", first);
        return ChangeMask::empty(width, height);
    }

    let level = otsu_level(diff_map);
    let mask = GrayImage::from_fn(width, height, |x, y| {
        if diff_map.get_pixel(x, y)[0] > level {
            Luma([CHANGED])
        } else {
            Luma([UNCHANGED])
        }
    });
    let mask = ChangeMask::from_image(&mask);

    tracing::debug!(
        "Otsu level {} marks {} of {} pixels as changed",
        level,
        mask.changed_pixels(),
        width as u64 * height as u64
    );
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_map_gives_empty_mask() {
        let mask = change_mask(&GrayImage::new(16, 16));
        assert!(mask.is_empty());
        assert_eq!((mask.width(), mask.height()), (16, 16));
    }

    #[test]
    fn uniformly_dissimilar_map_gives_empty_mask() {
        let mask = change_mask(&GrayImage::from_pixel(16, 16, Luma([25])));
        assert!(mask.is_empty());
    }

    #[test]
    fn bright_pixels_are_marked_changed() {
        let mut map = GrayImage::from_pixel(20, 20, Luma([3]));
        for y in 5..10 {
            for x in 5..10 {
                map.put_pixel(x, y, Luma([180]));
            }
        }
        let mask = change_mask(&map);
        assert_eq!(mask.changed_pixels(), 25);
        assert!(mask.is_changed(7, 7));
        assert!(!mask.is_changed(0, 0));
    }

    #[test]
    fn two_level_map_splits_between_levels() {
        let map = GrayImage::from_fn(10, 10, |x, _| Luma([if x < 7 { 0 } else { 40 }]));
        let mask = change_mask(&map);
        assert_eq!(mask.changed_pixels(), 30);
    }
}
