//! Contain-fit geometry for letterbox/pillarbox composition.
//!
//! A source frame is scaled uniformly so it fits entirely inside the
//! canvas, then centered; the remaining margin stays black.

/// The placed rectangle of a scaled source frame inside a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitRect {
    /// Left edge in canvas pixels
    pub x: u32,
    /// Top edge in canvas pixels
    pub y: u32,
    /// Drawn width in canvas pixels
    pub width: u32,
    /// Drawn height in canvas pixels
    pub height: u32,
}

impl FitRect {
    /// Check that the rect lies entirely within a canvas of the given size.
    pub fn contained_in(&self, canvas_w: u32, canvas_h: u32) -> bool {
        self.x + self.width <= canvas_w && self.y + self.height <= canvas_h
    }
}

/// Compute the contain-fit placement of a `src_w x src_h` frame on a
/// `canvas_w x canvas_h` canvas.
///
/// `scale = min(canvas_w / src_w, canvas_h / src_h)`, centered on both
/// axes. Degenerate source dimensions collapse to an empty rect at the
/// canvas center.
pub fn fit_contain(canvas_w: u32, canvas_h: u32, src_w: u32, src_h: u32) -> FitRect {
    if src_w == 0 || src_h == 0 {
        return FitRect {
            x: canvas_w / 2,
            y: canvas_h / 2,
            width: 0,
            height: 0,
        };
    }

    let scale = (canvas_w as f64 / src_w as f64).min(canvas_h as f64 / src_h as f64);
    let width = ((src_w as f64 * scale).round() as u32).min(canvas_w);
    let height = ((src_h as f64 * scale).round() as u32).min(canvas_h);

    FitRect {
        x: (canvas_w - width) / 2,
        y: (canvas_h - height) / 2,
        width,
        height,
    }
}
