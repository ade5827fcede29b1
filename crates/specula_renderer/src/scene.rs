//! Scene container: surface tree, material arena, lights and camera.

use log::debug;
use specula_math::{Interval, Ray};
use thiserror::Error;

use crate::{
    hittable::{HitRecord, Hittable},
    Camera, Light, Material, MaterialId, PhongMaterial, Surface, SurfaceList,
};

/// Errors raised while assembling a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("surface has no material assigned")]
    MissingMaterial,

    #[error("surface references unknown material {0:?}")]
    UnknownMaterial(MaterialId),

    #[error("a scene may contain at most one ambient light")]
    MultipleAmbientLights,

    #[error("a triangle needs 3 points, got {0}")]
    TooFewPoints(usize),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Everything the integrator reads while rendering.
///
/// Immutable once built, so a single instance is shared by all workers.
#[derive(Debug, Clone)]
pub struct Scene {
    pub root: Surface,
    pub materials: Vec<Material>,
    pub lights: Vec<Light>,
    pub camera: Camera,
}

impl Scene {
    pub fn new(root: Surface, materials: Vec<Material>, lights: Vec<Light>, camera: Camera) -> Self {
        Self {
            root,
            materials,
            lights,
            camera,
        }
    }

    pub fn builder() -> SceneBuilder {
        SceneBuilder::default()
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    /// Material of the surface behind a hit record.
    pub fn hit_material(&self, rec: &HitRecord) -> Option<&Material> {
        rec.material().and_then(|id| self.material(id))
    }

    /// Phong coefficients of the hit surface, if it has any.
    pub fn phong_material(&self, rec: &HitRecord) -> Option<&PhongMaterial> {
        self.hit_material(rec).and_then(Material::phong)
    }

    /// Closest hit against the whole scene.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        self.root.hit(ray, ray_t)
    }

    /// True when anything lies along `ray` inside `ray_t`.
    pub fn is_occluded(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.root.hit(ray, ray_t).is_some()
    }

    pub fn ambient_light(&self) -> Option<&Light> {
        self.lights.iter().find(|light| light.is_ambient())
    }

    /// Number of leaf surfaces in the tree.
    pub fn surface_count(&self) -> usize {
        let mut count = 0;
        self.root.for_each_leaf(&mut |_| count += 1);
        count
    }
}

/// Incrementally assembles a [`Scene`], checking material references.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    surfaces: SurfaceList,
    materials: Vec<Material>,
    lights: Vec<Light>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a material and return its identifier.
    pub fn add_material(&mut self, material: impl Into<Material>) -> MaterialId {
        let id = MaterialId(self.materials.len());
        self.materials.push(material.into());
        debug!("Added material {:?}", id);
        id
    }

    /// Add a surface. Every leaf must reference a material already added.
    pub fn add_surface(&mut self, surface: impl Into<Surface>) -> SceneResult<()> {
        let surface = surface.into();

        let mut result = Ok(());
        surface.for_each_leaf(&mut |leaf| {
            if result.is_err() {
                return;
            }
            result = match leaf.material() {
                None => Err(SceneError::MissingMaterial),
                Some(id) if id.0 >= self.materials.len() => Err(SceneError::UnknownMaterial(id)),
                Some(_) => Ok(()),
            };
        });
        result?;

        self.surfaces.add(surface);
        Ok(())
    }

    pub fn add_light(&mut self, light: Light) -> SceneResult<()> {
        if light.is_ambient() && self.lights.iter().any(Light::is_ambient) {
            return Err(SceneError::MultipleAmbientLights);
        }
        self.lights.push(light);
        Ok(())
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn build(self, camera: Camera) -> Scene {
        Scene::new(
            Surface::List(self.surfaces),
            self.materials,
            self.lights,
            camera,
        )
    }
}
