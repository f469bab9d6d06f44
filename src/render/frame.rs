use crate::{
    foundation::core::{Canvas, Rgb8},
    foundation::error::{ReelError, ReelResult},
};

/// A rendered frame as tightly packed, row-major RGB8 (`height x width x 3`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb8 {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, `width * height * 3` long.
    pub data: Vec<u8>,
}

impl FrameRgb8 {
    /// Black frame of the given size.
    pub fn black(canvas: Canvas) -> ReelResult<Self> {
        canvas.validate()?;
        let len = canvas
            .pixel_count()
            .checked_mul(3)
            .ok_or_else(|| ReelError::invalid_parameter("frame buffer size overflow"))?;
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; len],
        })
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn stride(&self) -> usize {
        self.width as usize * 3
    }

    /// Pixel at `(x, y)`; `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Per-channel mean over the whole frame.
    pub fn mean_rgb(&self) -> [f64; 3] {
        let mut sum = [0u64; 3];
        for px in self.data.chunks_exact(3) {
            for c in 0..3 {
                sum[c] += u64::from(px[c]);
            }
        }
        let n = (self.data.len() / 3).max(1) as f64;
        sum.map(|s| s as f64 / n)
    }

    /// Copy into an `image` buffer for encoding by callers.
    pub fn to_image(&self) -> ReelResult<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| ReelError::computation("frame buffer does not match its dimensions"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
