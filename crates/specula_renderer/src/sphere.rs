//! Sphere primitive.

use specula_math::{Interval, Ray, Vec3};

use crate::{hittable::GeometricHit, MaterialId};

/// A sphere given by center and radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Option<MaterialId>,
}

impl Sphere {
    /// Create a sphere with no material assigned yet.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            material: None,
        }
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    pub fn set_material(&mut self, material: Option<MaterialId>) {
        self.material = material;
    }

    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> Option<MaterialId> {
        self.material
    }

    /// Solve `|o + t*d - c|^2 = r^2` for the nearest root inside `ray_t`.
    ///
    /// The smaller root is tried first; when it lies below `ray_t.min` the
    /// larger one is used, which covers rays starting inside the sphere.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<GeometricHit> {
        if self.radius <= 0.0 {
            return None;
        }

        let p0 = ray.origin() - self.center;
        let d = ray.direction();
        let a = d.length_squared();
        if a == 0.0 {
            return None;
        }
        let b = 2.0 * p0.dot(d);
        let c = p0.length_squared() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let a2 = 2.0 * a;
        let mut t = (-b - sqrtd) / a2;
        if t < ray_t.min {
            t = (-b + sqrtd) / a2;
        }
        if !ray_t.contains(t) {
            return None;
        }

        let point = ray.at(t);
        let outward_normal = ((point - self.center) / self.radius).normalize();
        Some(GeometricHit {
            t,
            point,
            outward_normal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{hittable::Hittable, Surface};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_sphere_hit_from_above() {
        let sphere = Surface::from(Sphere::new(Vec3::new(1.0, -4.0, 0.0), 2.0));
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, -1.0, 0.0));

        let rec = sphere
            .hit(&ray, Interval::from_epsilon())
            .expect("ray should hit the sphere");

        assert!((rec.t - 2.0).abs() < 1e-4);
        assert!(approx(rec.point, Vec3::new(1.0, -2.0, 0.0)));
        assert!(approx(rec.normal, Vec3::Y));
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);

        assert!(sphere.intersect(&ray, Interval::from_epsilon()).is_none());
    }

    #[test]
    fn test_hit_beyond_tmax_is_rejected() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(sphere.intersect(&ray, Interval::new(1e-4, 5.0)).is_none());
        assert!(sphere.intersect(&ray, Interval::new(1e-4, 9.0)).is_some());
    }

    #[test]
    fn test_origin_inside_uses_far_root() {
        let sphere = Surface::from(Sphere::new(Vec3::ZERO, 3.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let rec = sphere.hit(&ray, Interval::from_epsilon()).unwrap();
        assert!((rec.t - 3.0).abs() < 1e-4);
        assert!(!rec.front_face);
        assert!(approx(rec.normal, Vec3::NEG_X));
    }

    #[test]
    fn test_surface_origin_outward_and_inward() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let center = Vec3::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            );
            let radius = rng.gen_range(0.5..4.0);
            let dir = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            )
            .normalize_or_zero();
            if dir == Vec3::ZERO {
                continue;
            }
            let sphere = Sphere::new(center, radius);
            let origin = center + dir * radius;

            let outward = Ray::new(origin, dir);
            assert!(sphere.intersect(&outward, Interval::from_epsilon()).is_none());

            let inward = Ray::new(origin, -dir);
            let hit = sphere
                .intersect(&inward, Interval::from_epsilon())
                .expect("inward ray must reach the opposite side");
            assert!((hit.t - 2.0 * radius).abs() < 1e-3 * radius.max(1.0));
            assert!((hit.point - (center - dir * radius)).length() < 1e-3);
        }
    }

    #[test]
    fn test_stored_normal_faces_ray() {
        let mut rng = StdRng::seed_from_u64(42);
        let sphere = Surface::from(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.5));

        for _ in 0..500 {
            let origin = Vec3::new(
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-7.0..1.0),
            );
            let target = Vec3::new(
                rng.gen_range(-1.5..1.5),
                rng.gen_range(-1.5..1.5),
                rng.gen_range(-4.5..-1.5),
            );
            let ray = Ray::new(origin, target - origin);
            if let Some(rec) = sphere.hit(&ray, Interval::from_epsilon()) {
                assert!(ray.direction().dot(rec.normal) <= 0.0);
                let outward = (rec.point - Vec3::new(0.0, 0.0, -3.0)).normalize();
                let cos = outward.dot(ray.direction().normalize());
                if cos.abs() > 1e-4 {
                    assert_eq!(rec.front_face, cos < 0.0);
                }
            }
        }
    }
}
