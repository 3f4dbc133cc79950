// Software raster primitives for strokes.
// Coverage is hard-edged: a pixel is inside a shape when its centre
// (x + 0.5, y + 0.5) is inside. Every write goes through the Surface, so
// anything off the raster is dropped.

use std::f32::consts::FRAC_1_SQRT_2;

use crate::types::{Point, Rgba, StrokeStyle, Surface};

/// Smallest radius that still reaches a pixel centre from anywhere inside that pixel.
/// Keeps hairline strokes connected.
pub const MIN_COVERAGE_RADIUS: f32 = FRAC_1_SQRT_2;

/// Call `f` for every on-surface pixel whose centre lies within `radius` of segment a→b.
/// A zero-length segment is a disc.
fn for_each_covered(
    surface: &Surface,
    a: Point,
    b: Point,
    radius: f32,
    mut f: impl FnMut(i32, i32),
) {
    let r = radius.max(MIN_COVERAGE_RADIUS);
    let r2 = r * r;

    // Bounding box, clipped to the raster so far-off points cost nothing.
    let x0 = (a.x.min(b.x) - r).floor().max(0.0) as i32;
    let y0 = (a.y.min(b.y) - r).floor().max(0.0) as i32;
    let x1 = (a.x.max(b.x) + r).ceil().min(surface.width() as f32 - 1.0) as i32;
    let y1 = (a.y.max(b.y) + r).ceil().min(surface.height() as f32 - 1.0) as i32;

    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;

    for py in y0..=y1 {
        for px in x0..=x1 {
            let cx = px as f32 + 0.5;
            let cy = py as f32 + 0.5;
            // Closest point on the segment to this pixel centre.
            let t = if len2 > 0.0 {
                (((cx - a.x) * dx + (cy - a.y) * dy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let ex = cx - (a.x + dx * t);
            let ey = cy - (a.y + dy * t);
            if ex * ex + ey * ey <= r2 {
                f(px, py);
            }
        }
    }
}

/// Filled disc, source-over in `color`.
pub fn fill_disc(surface: &mut Surface, center: Point, radius: f32, color: Rgba) {
    let mut hits = Vec::new();
    for_each_covered(surface, center, center, radius, |x, y| hits.push((x, y)));
    for (x, y) in hits {
        surface.blend(x, y, color);
    }
}

/// Round-capped line from `a` to `b` at the style's width and colour.
/// Each covered pixel is blended exactly once per segment.
pub fn stroke_segment(surface: &mut Surface, a: Point, b: Point, style: &StrokeStyle) {
    let mut hits = Vec::new();
    for_each_covered(surface, a, b, style.width.get() / 2.0, |x, y| hits.push((x, y)));
    for (x, y) in hits {
        surface.blend(x, y, style.color);
    }
}

/// Punch a transparent disc through the surface (destination-out, opaque source).
pub fn erase_disc(surface: &mut Surface, center: Point, radius: f32) {
    let mut hits = Vec::new();
    for_each_covered(surface, center, center, radius, |x, y| hits.push((x, y)));
    for (x, y) in hits {
        surface.erase(x, y);
    }
}
