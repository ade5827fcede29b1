//! Pinhole camera for ray generation.

use specula_math::{Ray, Vec3};

use crate::{RenderError, RenderResult};

/// Camera for generating primary rays into the scene.
///
/// The viewport sits one unit in front of the eye. Every setter rebuilds
/// the basis and viewport right away.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    // Camera positioning
    eye: Vec3,
    target: Vec3,
    up: Vec3,

    /// Vertical field of view in degrees
    fovy: f32,
    /// Viewport width / height
    aspect: f32,

    // Derived values
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, up: Vec3, fovy: f32, aspect: f32) -> Self {
        let mut camera = Self {
            eye,
            target,
            up,
            fovy,
            aspect,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            lower_left: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
        };
        camera.update();
        camera
    }

    /// Reposition the camera.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.eye = eye;
        self.target = target;
        self.up = up;
        self.update();
    }

    pub fn set_fovy(&mut self, fovy: f32) {
        self.fovy = fovy;
        self.update();
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update();
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect
    }

    /// Orthonormal basis `(u, v, w)`; `w` points from the target to the eye.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Check that the camera can produce a usable image.
    pub fn validate(&self) -> RenderResult<()> {
        if !self.aspect.is_finite() || self.aspect <= 0.0 {
            return Err(RenderError::InvalidCamera(format!(
                "aspect ratio must be positive, got {}",
                self.aspect
            )));
        }
        if !self.fovy.is_finite() || self.fovy <= 0.0 || self.fovy >= 180.0 {
            return Err(RenderError::InvalidCamera(format!(
                "vertical field of view must be in (0, 180) degrees, got {}",
                self.fovy
            )));
        }
        if !self.basis_is_finite() {
            return Err(RenderError::InvalidCamera(
                "eye, target and up do not define a view direction".to_string(),
            ));
        }
        Ok(())
    }

    fn basis_is_finite(&self) -> bool {
        self.u.is_finite() && self.v.is_finite() && self.w.is_finite()
    }

    fn update(&mut self) {
        self.w = (self.eye - self.target).normalize();
        self.u = self.up.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        let height = 2.0 * (self.fovy.to_radians() / 2.0).tan();
        let width = height * self.aspect;
        self.vertical = height * self.v;
        self.horizontal = width * self.u;
        self.lower_left = self.eye - self.w - 0.5 * (self.horizontal + self.vertical);
    }

    /// Ray through normalized viewport coordinates; `(0, 0)` is the
    /// bottom-left corner and `(1, 1)` the top-right.
    pub fn get_ray(&self, s: f32, t: f32) -> Ray {
        let target = self.lower_left + s * self.horizontal + t * self.vertical;
        Ray::new(self.eye, target - self.eye)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 60.0, 16.0 / 9.0)
    }
}
