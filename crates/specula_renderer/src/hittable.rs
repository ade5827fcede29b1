//! Hittable trait and HitRecord for ray-surface intersection.

use specula_math::{Interval, Ray, Vec3};

use crate::{MaterialId, Surface};

/// Raw intersection geometry reported by a leaf shape.
///
/// The normal is the shape's natural outward normal; it has not been
/// oriented against the ray yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricHit {
    pub t: f32,
    pub point: Vec3,
    pub outward_normal: Vec3,
}

/// Record of a ray-surface intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Surface normal at intersection (always points against the ray)
    pub normal: Vec3,
    /// Whether the outward normal already faced the incoming ray
    pub front_face: bool,
    /// The leaf surface that was hit, borrowed for the shading pass
    pub surface: &'a Surface,
}

impl<'a> HitRecord<'a> {
    /// Build a record for `surface`, orienting the normal toward the ray.
    pub fn new(ray: &Ray, hit: GeometricHit, surface: &'a Surface) -> Self {
        let (front_face, normal) = face_normal(ray.direction(), hit.outward_normal);
        Self {
            t: hit.t,
            point: hit.point,
            normal,
            front_face,
            surface,
        }
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    #[inline]
    pub fn is_front_face(&self) -> bool {
        self.front_face
    }

    /// Material of the hit surface, if it has one.
    pub fn material(&self) -> Option<MaterialId> {
        self.surface.material()
    }
}

/// Orient an outward normal against a ray direction.
///
/// Returns `(front_face, normal)` where `normal · direction <= 0`. A grazing
/// ray (`outward · direction == 0`) counts as front-facing.
#[inline]
pub fn face_normal(direction: Vec3, outward_normal: Vec3) -> (bool, Vec3) {
    if outward_normal.dot(direction) > 0.0 {
        (false, -outward_normal)
    } else {
        (true, outward_normal)
    }
}

/// Trait for anything a ray can be intersected with.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `ray` whose parameter lies in `ray_t`.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_normal_front() {
        let (front, normal) = face_normal(Vec3::NEG_Y, Vec3::Y);
        assert!(front);
        assert_eq!(normal, Vec3::Y);
    }

    #[test]
    fn test_face_normal_back_is_flipped() {
        let (front, normal) = face_normal(Vec3::Z, Vec3::Z);
        assert!(!front);
        assert_eq!(normal, Vec3::NEG_Z);
    }

    #[test]
    fn test_grazing_ray_is_front_facing() {
        let (front, normal) = face_normal(Vec3::X, Vec3::Y);
        assert!(front);
        assert_eq!(normal, Vec3::Y);
    }
}
