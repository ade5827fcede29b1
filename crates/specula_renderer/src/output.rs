//! Float image buffer and file output.
//!
//! `.exr` files receive the raw linear floats. Every other format goes
//! through gamma correction and 8-bit quantization.

use std::path::Path;

use log::info;
use thiserror::Error;

use crate::Color;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("no rendered image to write")]
    Empty,

    #[error("gamma must be positive and finite, got {0}")]
    InvalidGamma(f32),

    #[error("pixel buffer does not match {width}x{height}")]
    BufferSize { width: u32, height: u32 },

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Linear RGB float image, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Copy a `width` x `height` block of row-major pixels with its
    /// top-left corner at `(x, y)`.
    pub fn write_block(&mut self, x: u32, y: u32, width: u32, height: u32, block: &[Color]) {
        for row in 0..height {
            let src = (row * width) as usize;
            let dst = self.index(x, y + row);
            self.pixels[dst..dst + width as usize]
                .copy_from_slice(&block[src..src + width as usize]);
        }
    }

    /// Gamma-corrected 8-bit RGB bytes.
    pub fn to_rgb8(&self, gamma: f32) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&c| {
                let c = gamma_correct(c, gamma);
                [to_u8(c.x), to_u8(c.y), to_u8(c.z)]
            })
            .collect()
    }
}

/// Raise each channel to `1 / gamma`. Negative channels become zero.
pub fn gamma_correct(color: Color, gamma: f32) -> Color {
    let inv = 1.0 / gamma;
    let c = color.max(Color::ZERO);
    Color::new(c.x.powf(inv), c.y.powf(inv), c.z.powf(inv))
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v * 255.0 + 0.5).clamp(0.0, 255.0) as u8
}

fn is_exr(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("exr"))
}

/// Write `buffer` to `path`, picking the encoder from the extension.
pub fn write_image(buffer: &ImageBuffer, path: impl AsRef<Path>, gamma: f32) -> OutputResult<()> {
    let path = path.as_ref();

    if buffer.is_empty() {
        return Err(OutputError::Empty);
    }
    let size_error = || OutputError::BufferSize {
        width: buffer.width,
        height: buffer.height,
    };

    if is_exr(path) {
        let floats: Vec<f32> = bytemuck::cast_slice(&buffer.pixels).to_vec();
        let image = image::Rgb32FImage::from_raw(buffer.width, buffer.height, floats)
            .ok_or_else(size_error)?;
        image.save(path)?;
    } else {
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(OutputError::InvalidGamma(gamma));
        }
        let image = image::RgbImage::from_raw(buffer.width, buffer.height, buffer.to_rgb8(gamma))
            .ok_or_else(size_error)?;
        image.save(path)?;
    }

    info!(
        "Wrote {}x{} image to {}",
        buffer.width,
        buffer.height,
        path.display()
    );
    Ok(())
}
