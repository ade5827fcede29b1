//! Whitted ray tracing renderer.
//!
//! Implements:
//! - One primary ray through the center of each pixel
//! - Recursive reflection and refraction up to a configurable depth
//! - Bucketed parallel rendering with rayon

use std::path::Path;

use log::{error, info};
use rayon::prelude::*;
use thiserror::Error;

use crate::{
    bucket::{generate_buckets, render_bucket, DEFAULT_BUCKET_SIZE},
    integrator::ray_color,
    output::{write_image, ImageBuffer, OutputError, OutputResult},
    progress::Progress,
    Camera, Color, Scene,
};

/// Errors that prevent a render from starting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("invalid camera: {0}")]
    InvalidCamera(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Output image height in pixels; the width follows the camera aspect
    pub image_height: u32,
    /// Maximum recursion depth for reflected and refracted rays
    pub max_depth: u32,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_height: 180,
            max_depth: 5,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    pub fn with_image_height(mut self, image_height: u32) -> Self {
        self.image_height = image_height;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = bucket_size;
        self
    }
}

/// Image size for a camera aspect and a target height.
///
/// The width is `aspect * height` rounded to the nearest integer.
pub fn image_dimensions(aspect: f32, height: u32) -> RenderResult<(u32, u32)> {
    let width = (aspect as f64 * height as f64).round();
    if height == 0 || !width.is_finite() || width < 1.0 || width > u32::MAX as f64 {
        return Err(RenderError::InvalidDimensions {
            width: if width.is_finite() { width as i64 } else { 0 },
            height: height as i64,
        });
    }
    Ok((width as u32, height))
}

/// Color of pixel `(x, y)` with `y` counted from the bottom of the image.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    max_depth: u32,
) -> Color {
    let s = (x as f32 + 0.5) / width as f32;
    let t = (y as f32 + 0.5) / height as f32;
    let ray = camera.get_ray(s, t);
    ray_color(&ray, scene, 0, max_depth).unwrap_or(Color::ZERO)
}

/// Renders scenes and holds the most recent image.
#[derive(Debug, Default)]
pub struct RayTracer {
    config: RenderConfig,
    image: Option<ImageBuffer>,
}

impl RayTracer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            image: None,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn set_image_height(&mut self, height: u32) {
        self.config.image_height = height;
    }

    pub fn image_height(&self) -> u32 {
        self.config.image_height
    }

    pub fn set_max_depth(&mut self, max_depth: u32) {
        self.config.max_depth = max_depth;
    }

    /// The last successfully rendered image.
    pub fn image(&self) -> Option<&ImageBuffer> {
        self.image.as_ref()
    }

    /// Render `scene` through its camera.
    ///
    /// On error the previous image is discarded and nothing is kept.
    pub fn render(&mut self, scene: &Scene) -> RenderResult<()> {
        self.image = None;

        if let Err(e) = scene.camera.validate() {
            error!("RayTracer: {}", e);
            return Err(e);
        }
        let (width, height) =
            image_dimensions(scene.camera.aspect_ratio(), self.config.image_height).map_err(|e| {
                error!("RayTracer: {}", e);
                e
            })?;

        info!(
            "Rendering {}x{} (max depth {}, {} lights)",
            width,
            height,
            self.config.max_depth,
            scene.lights.len()
        );

        let buckets = generate_buckets(width, height, self.config.bucket_size);
        let progress = Progress::start(width as usize * height as usize);
        let max_depth = self.config.max_depth;

        let results: Vec<_> = buckets
            .par_iter()
            .map(|bucket| {
                let result = render_bucket(bucket, scene, width, height, max_depth);
                progress.advance(bucket.pixel_count() as usize);
                result
            })
            .collect();

        let mut image = ImageBuffer::new(width, height);
        for result in &results {
            let b = result.bucket;
            image.write_block(b.x, b.y, b.width, b.height, &result.pixels);
        }

        progress.finish();
        self.image = Some(image);
        Ok(())
    }

    /// Write the last render to `path`.
    pub fn write_image(&self, path: impl AsRef<Path>, gamma: f32) -> OutputResult<()> {
        let image = self.image.as_ref().ok_or(OutputError::Empty)?;
        write_image(image, path, gamma)
    }
}
