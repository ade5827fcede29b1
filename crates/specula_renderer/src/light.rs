//! Light sources.

use specula_math::{Interval, Ray, Vec3, EPSILON, EPSILON_SQUARED};

use crate::{hittable::HitRecord, material::Color, Scene};

/// An isotropic point emitter with inverse-square falloff.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: Color,
}

impl PointLight {
    pub fn new(position: Vec3, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }

    /// Blinn-Phong contribution at `rec`, zero when the light is blocked.
    pub fn illuminate(&self, rec: &HitRecord, view_dir: Vec3, scene: &Scene) -> Color {
        let to_light = self.position - rec.point;
        let distance_squared = to_light.length_squared();
        let distance = distance_squared.sqrt();
        let light_dir = to_light.normalize_or_zero();

        let shadow_ray = Ray::new(rec.point, light_dir);
        if scene.is_occluded(&shadow_ray, Interval::new(EPSILON, distance)) {
            return Color::ZERO;
        }

        let Some(phong) = scene.phong_material(rec) else {
            return Color::ZERO;
        };

        let cos_theta = rec.normal.dot(light_dir).max(0.0);
        let irradiance = self.intensity * cos_theta / distance_squared.max(EPSILON_SQUARED);
        irradiance * phong.evaluate(rec, light_dir, view_dir)
    }
}

/// Constant light applied to every hit, never shadowed.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
}

impl AmbientLight {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn illuminate(&self, rec: &HitRecord, scene: &Scene) -> Color {
        scene
            .phong_material(rec)
            .map_or(Color::ZERO, |phong| self.color * phong.ambient)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Point(PointLight),
    Ambient(AmbientLight),
}

impl Light {
    pub fn point(position: Vec3, intensity: Color) -> Self {
        Light::Point(PointLight::new(position, intensity))
    }

    pub fn ambient(color: Color) -> Self {
        Light::Ambient(AmbientLight::new(color))
    }

    pub fn is_ambient(&self) -> bool {
        matches!(self, Light::Ambient(_))
    }

    /// Radiance this light sends toward `view_dir` from the hit point.
    pub fn illuminate(&self, rec: &HitRecord, view_dir: Vec3, scene: &Scene) -> Color {
        match self {
            Light::Point(light) => light.illuminate(rec, view_dir, scene),
            Light::Ambient(light) => light.illuminate(rec, scene),
        }
    }
}
