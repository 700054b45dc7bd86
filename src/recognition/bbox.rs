use image::GrayImage;

use crate::models::{BoundingBox, Point};

/// Pixels added on every side of the drawn region
pub const BOUNDARY_MARGIN: u32 = 5;

/// Bounding box of a stroke on a `width` x `height` canvas.
///
/// Points dragged outside the canvas are clamped onto its edge.
pub fn from_points(points: &[Point], width: u32, height: u32, margin: u32) -> Option<BoundingBox> {
    if points.is_empty() || width == 0 || height == 0 {
        return None;
    }

    let clamp = |v: i32, extent: u32| {
        let last = i32::try_from(extent).unwrap_or(i32::MAX) - 1;
        v.clamp(0, last) as u32
    };

    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    for p in points {
        let x = clamp(p.x, width);
        let y = clamp(p.y, height);
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    Some(expand(min_x, min_y, max_x, max_y, width, height, margin))
}

/// Bounding box of every pixel brighter than zero
pub fn from_buffer(buffer: &GrayImage, margin: u32) -> Option<BoundingBox> {
    let (width, height) = buffer.dimensions();

    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut has_content = false;

    for (x, y, pixel) in buffer.enumerate_pixels() {
        if pixel[0] > 0 {
            has_content = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if !has_content {
        return None;
    }

    Some(expand(min_x, min_y, max_x, max_y, width, height, margin))
}

/// Grow an inclusive pixel range by `margin` and turn it into an exclusive box
/// clamped to the canvas.
fn expand(
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    width: u32,
    height: u32,
    margin: u32,
) -> BoundingBox {
    BoundingBox {
        min_x: min_x.saturating_sub(margin),
        min_y: min_y.saturating_sub(margin),
        max_x: (max_x + margin + 1).min(width),
        max_y: (max_y + margin + 1).min(height),
    }
}
