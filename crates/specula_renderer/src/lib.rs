//! Specula renderer - CPU Whitted ray tracing
//!
//! Traces one primary ray per pixel through a scene of spheres and
//! triangles shaded with Blinn-Phong, with shadow rays, mirror
//! reflection and Fresnel-weighted refraction.

mod bucket;
mod camera;
mod hittable;
mod integrator;
mod light;
mod material;
mod output;
mod progress;
mod renderer;
mod scene;
mod sphere;
mod surface;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use hittable::{face_normal, GeometricHit, HitRecord, Hittable};
pub use integrator::ray_color;
pub use light::{AmbientLight, Light, PointLight};
pub use material::{
    reflect, Color, Material, MaterialId, PhongDielectric, PhongMaterial, Scatter,
};
pub use output::{gamma_correct, write_image, ImageBuffer, OutputError, OutputResult};
pub use progress::Progress;
pub use renderer::{
    image_dimensions, render_pixel, RayTracer, RenderConfig, RenderError, RenderResult,
};
pub use scene::{Scene, SceneBuilder, SceneError, SceneResult};
pub use sphere::Sphere;
pub use surface::{Surface, SurfaceList};
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from specula_math
pub use specula_math::{Interval, Ray, Vec3, EPSILON};
