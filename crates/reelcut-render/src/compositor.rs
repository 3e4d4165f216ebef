//! Frame composition onto the fixed-geometry canvas.
//!
//! Every delivered frame is contain-fitted (uniform scale, centered)
//! and painted over a black canvas; the canvas persists between frames
//! so a starved decoder simply holds its last image.

use reelcut_core::{fit_contain, FrameBuffer, RenderTarget};

/// Paints decoded frames onto the output canvas.
pub struct Compositor {
    canvas: FrameBuffer,
    /// Scratch column map for the active fit, rebuilt when the source
    /// geometry changes
    col_map: Vec<u32>,
    col_map_key: (u32, u32),
}

impl Compositor {
    /// Create a compositor with a black canvas at the target geometry.
    pub fn new(target: &RenderTarget) -> Self {
        let mut canvas = FrameBuffer::new(target.width, target.height);
        canvas.clear_black();
        Self {
            canvas,
            col_map: Vec::new(),
            col_map_key: (0, 0),
        }
    }

    /// Paint one source frame, scaled and centered, margins black.
    /// Returns the composed canvas.
    pub fn compose(&mut self, frame: &FrameBuffer) -> &FrameBuffer {
        self.canvas.clear_black();

        let fit = fit_contain(self.canvas.width, self.canvas.height, frame.width, frame.height);
        if fit.width == 0 || fit.height == 0 {
            return &self.canvas;
        }

        if self.col_map_key != (frame.width, fit.width) {
            self.col_map = (0..fit.width)
                .map(|dx| (dx as u64 * frame.width as u64 / fit.width as u64) as u32)
                .collect();
            self.col_map_key = (frame.width, fit.width);
        }

        for dy in 0..fit.height {
            // Nearest-neighbor row sampling
            let sy = (dy as u64 * frame.height as u64 / fit.height as u64) as u32;
            let src_row = frame.row(sy);
            let dst_row = self.canvas.row_mut(fit.y + dy);
            for (dx, sx) in self.col_map.iter().enumerate() {
                let d = (fit.x as usize + dx) * 4;
                let s = (*sx as usize) * 4;
                dst_row[d..d + 4].copy_from_slice(&src_row[s..s + 4]);
            }
        }

        &self.canvas
    }

    /// The current canvas contents (the last composed frame, or black).
    pub fn canvas(&self) -> &FrameBuffer {
        &self.canvas
    }
}
