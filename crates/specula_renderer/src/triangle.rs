//! Triangle primitive for ray tracing.
//!
//! Intersection solves the 3x3 barycentric system with Cramer's rule,
//! which is the same computation as Möller-Trumbore written out in
//! determinant form.

use log::warn;
use specula_math::{Interval, Mat3, Ray, Vec3, DETERMINANT_EPSILON};

use crate::{hittable::GeometricHit, MaterialId, SceneError, SceneResult};

/// A flat triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Vertices, counter-clockwise when seen from the front face
    points: [Vec3; 3],
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    material: Option<MaterialId>,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(points: [Vec3; 3]) -> Self {
        Self {
            points,
            normal: Self::face_normal(&points),
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

    pub fn material(&self) -> Option<MaterialId> {
        self.material
    }

    /// Replace the vertices and recompute the face normal.
    ///
    /// Extra points past the third are ignored with a warning.
    pub fn set_points(&mut self, points: &[Vec3]) -> SceneResult<()> {
        if points.len() < 3 {
            return Err(SceneError::TooFewPoints(points.len()));
        }
        if points.len() > 3 {
            warn!(
                "Triangle::set_points: got {} points, using the first three",
                points.len()
            );
        }

        self.points = [points[0], points[1], points[2]];
        self.normal = Self::face_normal(&self.points);
        Ok(())
    }

    /// The three vertices in the order they were set.
    pub fn points(&self) -> [Vec3; 3] {
        self.points
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    fn face_normal(points: &[Vec3; 3]) -> Vec3 {
        (points[1] - points[0])
            .cross(points[2] - points[0])
            .normalize_or_zero()
    }

    /// Intersect the ray with the triangle's plane and test the
    /// barycentric coordinates `(beta, gamma)` of the hit point.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<GeometricHit> {
        let [p0, p1, p2] = self.points;

        // beta * (p0 - p1) + gamma * (p0 - p2) + t * d = p0 - o
        let col_beta = p0 - p1;
        let col_gamma = p0 - p2;
        let col_t = ray.direction();
        let rhs = p0 - ray.origin();

        let m = Mat3::from_cols(col_beta, col_gamma, col_t).determinant();
        // Ray is parallel to the triangle plane (or the triangle is degenerate)
        if m.abs() < DETERMINANT_EPSILON {
            return None;
        }

        let t = Mat3::from_cols(col_beta, col_gamma, rhs).determinant() / m;
        if !ray_t.contains(t) {
            return None;
        }

        let gamma = Mat3::from_cols(col_beta, rhs, col_t).determinant() / m;
        if !(0.0..=1.0).contains(&gamma) {
            return None;
        }

        let beta = Mat3::from_cols(rhs, col_gamma, col_t).determinant() / m;
        if beta < 0.0 || beta > 1.0 - gamma {
            return None;
        }

        Some(GeometricHit {
            t,
            point: ray.at(t),
            outward_normal: self.normal,
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

    fn test_triangle() -> Triangle {
        Triangle::new([
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
        ])
    }

    #[test]
    fn test_triangle_hit_back_face() {
        let tri = Surface::from(test_triangle());
        let ray = Ray::new(Vec3::new(1.0, 1.0, -1.0), Vec3::Z);

        let rec = tri
            .hit(&ray, Interval::from_epsilon())
            .expect("ray should hit the triangle");

        assert!((rec.t - 1.0).abs() < 1e-4);
        assert!(approx(rec.point, Vec3::new(1.0, 1.0, 0.0)));
        assert!(approx(rec.normal, Vec3::NEG_Z));
        assert!(!rec.front_face);
    }

    #[test]
    fn test_triangle_hit_front_face() {
        let tri = Surface::from(test_triangle());
        let ray = Ray::new(Vec3::new(1.0, 0.5, 3.0), Vec3::NEG_Z);

        let rec = tri.hit(&ray, Interval::from_epsilon()).unwrap();
        assert!((rec.t - 3.0).abs() < 1e-4);
        assert!(approx(rec.normal, Vec3::Z));
        assert!(rec.front_face);
    }

    #[test]
    fn test_triangle_miss_outside_edges() {
        let tri = test_triangle();

        // Beyond the apex
        let ray = Ray::new(Vec3::new(1.0, 2.5, -1.0), Vec3::Z);
        assert!(tri.intersect(&ray, Interval::from_epsilon()).is_none());

        // Left of the p0-p2 edge
        let ray = Ray::new(Vec3::new(0.1, 1.5, -1.0), Vec3::Z);
        assert!(tri.intersect(&ray, Interval::from_epsilon()).is_none());
    }

    #[test]
    fn test_parallel_ray_is_rejected() {
        let tri = test_triangle();
        let ray = Ray::new(Vec3::new(-1.0, 0.5, 0.0), Vec3::X);

        assert!(tri.intersect(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_hit_behind_origin_is_rejected() {
        let tri = test_triangle();
        let ray = Ray::new(Vec3::new(1.0, 1.0, 1.0), Vec3::Z);

        assert!(tri.intersect(&ray, Interval::from_epsilon()).is_none());
    }

    #[test]
    fn test_normal_is_counter_clockwise() {
        assert!(approx(test_triangle().normal(), Vec3::Z));

        let flipped = Triangle::new([
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ]);
        assert!(approx(flipped.normal(), Vec3::NEG_Z));
    }

    #[test]
    fn test_set_points_round_trip() {
        let mut tri = test_triangle();
        let points = [
            Vec3::new(3.0, 1.0, -2.0),
            Vec3::new(-1.0, 4.0, 0.5),
            Vec3::new(0.0, -2.0, 7.0),
        ];

        tri.set_points(&points).unwrap();
        assert_eq!(tri.points(), points);

        let expected = (points[1] - points[0])
            .cross(points[2] - points[0])
            .normalize();
        assert!(approx(tri.normal(), expected));
    }

    #[test]
    fn test_set_points_uses_first_three() {
        let mut tri = test_triangle();
        let points = [Vec3::X, Vec3::Y, Vec3::Z, Vec3::ONE];

        tri.set_points(&points).unwrap();
        assert_eq!(tri.points(), [Vec3::X, Vec3::Y, Vec3::Z]);
    }

    #[test]
    fn test_set_points_too_few() {
        let mut tri = test_triangle();
        let before = tri.points();

        let result = tri.set_points(&[Vec3::X, Vec3::Y]);
        assert!(matches!(result, Err(SceneError::TooFewPoints(2))));
        assert_eq!(tri.points(), before);
    }

    #[test]
    fn test_stored_normal_faces_ray() {
        let mut rng = StdRng::seed_from_u64(3);
        let tri = Surface::from(test_triangle());

        for _ in 0..500 {
            let origin = Vec3::new(
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
            );
            let target = Vec3::new(rng.gen_range(0.0..2.0), rng.gen_range(0.0..2.0), 0.0);
            let ray = Ray::new(origin, target - origin);
            if let Some(rec) = tri.hit(&ray, Interval::from_epsilon()) {
                assert!(ray.direction().dot(rec.normal) <= 0.0);
                assert_eq!(rec.front_face, origin.z > 0.0);
            }
        }
    }
}
