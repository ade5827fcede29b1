//! Recursive Whitted-style radiance estimate.
//!
//! Opaque Phong surfaces gather direct light from every source and may add
//! one ideal mirror bounce. Dielectrics split into a reflected and a
//! refracted ray weighted by the Schlick reflectance. There is no
//! background: a ray that escapes contributes nothing.

use log::error;
use specula_math::{Interval, Ray};

use crate::{
    hittable::HitRecord,
    material::{reflect, Color, Material, PhongDielectric, PhongMaterial},
    Scene,
};

/// Color carried back along `ray`.
///
/// Returns `None` when the recursion budget is spent (`depth >= max_depth`)
/// or the ray escapes the scene; callers treat that as contributing
/// nothing. A hit on a surface without a material shades black.
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, max_depth: u32) -> Option<Color> {
    if depth >= max_depth {
        return None;
    }

    let rec = scene.hit(ray, Interval::from_epsilon())?;

    let Some(material) = scene.hit_material(&rec) else {
        error!("ray_color: surface has no material, returning black");
        return Some(Color::ZERO);
    };

    let color = match material {
        Material::Dielectric(dielectric) => {
            shade_dielectric(ray, &rec, dielectric, scene, depth, max_depth)
        }
        Material::Phong(phong) => shade_opaque(ray, &rec, phong, scene, depth, max_depth),
    };
    Some(color)
}

fn shade_dielectric(
    ray: &Ray,
    rec: &HitRecord,
    dielectric: &PhongDielectric,
    scene: &Scene,
    depth: u32,
    max_depth: u32,
) -> Color {
    let scatter = dielectric.scatter(ray, rec);
    let mut color = Color::ZERO;

    if let Some(refracted) = scatter.refracted {
        if let Some(c) = ray_color(&refracted, scene, depth + 1, max_depth) {
            color += scatter.attenuation * c * (1.0 - scatter.reflectance);
        }
    }
    if let Some(c) = ray_color(&scatter.reflected, scene, depth + 1, max_depth) {
        color += scatter.attenuation * c * scatter.reflectance;
    }

    color
}

fn shade_opaque(
    ray: &Ray,
    rec: &HitRecord,
    phong: &PhongMaterial,
    scene: &Scene,
    depth: u32,
    max_depth: u32,
) -> Color {
    let view_dir = -ray.direction().normalize();
    let mut color: Color = scene
        .lights
        .iter()
        .map(|light| light.illuminate(rec, view_dir, scene))
        .sum();

    // Mirror bounce only leaves the outside of a surface
    if phong.has_mirror() && rec.front_face {
        let normal = rec.normal.normalize();
        let reflected = Ray::new(rec.point, reflect(ray.direction(), normal));
        if let Some(c) = ray_color(&reflected, scene, depth + 1, max_depth) {
            color += c * phong.mirror;
        }
    }

    color
}
