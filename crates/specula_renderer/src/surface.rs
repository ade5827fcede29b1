//! The closed set of renderable surfaces and the surface list aggregate.

use specula_math::{Interval, Ray};

use crate::{
    hittable::{HitRecord, Hittable},
    MaterialId, Sphere, Triangle,
};

/// Anything that can be placed in a scene.
///
/// Leaf shapes carry a material; a list only forwards to its children.
#[derive(Debug, Clone)]
pub enum Surface {
    Sphere(Sphere),
    Triangle(Triangle),
    List(SurfaceList),
}

impl Surface {
    /// Material of a leaf shape. Lists never have one.
    pub fn material(&self) -> Option<MaterialId> {
        match self {
            Surface::Sphere(sphere) => sphere.material(),
            Surface::Triangle(triangle) => triangle.material(),
            Surface::List(_) => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, Surface::List(_))
    }

    /// Visit every leaf shape, descending through nested lists.
    pub fn for_each_leaf<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Surface),
    {
        match self {
            Surface::List(list) => {
                for surface in list.iter() {
                    surface.for_each_leaf(f);
                }
            }
            leaf => f(leaf),
        }
    }
}

impl Hittable for Surface {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        match self {
            Surface::Sphere(sphere) => sphere
                .intersect(ray, ray_t)
                .map(|hit| HitRecord::new(ray, hit, self)),
            Surface::Triangle(triangle) => triangle
                .intersect(ray, ray_t)
                .map(|hit| HitRecord::new(ray, hit, self)),
            Surface::List(list) => list.hit(ray, ray_t),
        }
    }
}

impl From<Sphere> for Surface {
    fn from(sphere: Sphere) -> Self {
        Surface::Sphere(sphere)
    }
}

impl From<Triangle> for Surface {
    fn from(triangle: Triangle) -> Self {
        Surface::Triangle(triangle)
    }
}

impl From<SurfaceList> for Surface {
    fn from(list: SurfaceList) -> Self {
        Surface::List(list)
    }
}

/// An ordered collection of surfaces that reports the closest hit.
#[derive(Debug, Clone, Default)]
pub struct SurfaceList {
    surfaces: Vec<Surface>,
}

impl SurfaceList {
    /// Create a new empty surface list.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, surface: impl Into<Surface>) {
        self.surfaces.push(surface.into());
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter()
    }
}

impl From<Vec<Surface>> for SurfaceList {
    fn from(surfaces: Vec<Surface>) -> Self {
        Self { surfaces }
    }
}

impl Hittable for SurfaceList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest = None;
        let mut closest_so_far = ray_t.max;

        // Every accepted hit tightens the window for the remaining children
        for surface in &self.surfaces {
            if let Some(rec) = surface.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}
