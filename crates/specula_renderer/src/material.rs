//! Phong-family materials: opaque Blinn-Phong and the refractive dielectric.

use specula_math::{Ray, Vec3};

use crate::hittable::HitRecord;

/// Color type alias (linear RGB, not clamped)
pub type Color = Vec3;

/// Index of a material in [`Scene::materials`](crate::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub usize);

/// Local Blinn-Phong reflectance plus an optional ideal mirror term.
#[derive(Debug, Clone, PartialEq)]
pub struct PhongMaterial {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
    /// Ideal mirror reflection coefficient; zero disables the mirror bounce
    pub mirror: Color,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            ambient: Color::ZERO,
            diffuse: Color::ZERO,
            specular: Color::ZERO,
            shininess: 1.0,
            mirror: Color::ZERO,
        }
    }
}

impl PhongMaterial {
    pub fn new(
        ambient: Color,
        diffuse: Color,
        specular: Color,
        shininess: f32,
        mirror: Color,
    ) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
            mirror,
        }
    }

    pub fn has_mirror(&self) -> bool {
        self.mirror != Color::ZERO
    }

    /// Reflectance toward `view_dir` for light arriving from `light_dir`.
    ///
    /// Both directions are unit length and point away from the surface.
    /// Back faces are shaded the same way as front faces.
    pub fn evaluate(&self, rec: &HitRecord, light_dir: Vec3, view_dir: Vec3) -> Color {
        let normal = rec.normal.normalize_or_zero();
        let half = (view_dir + light_dir).normalize_or_zero();
        let falloff = half.dot(normal).max(0.0).powf(self.shininess);
        self.specular * falloff + self.diffuse
    }
}

/// Result of splitting a ray at a dielectric interface.
#[derive(Debug, Clone, Copy)]
pub struct Scatter {
    /// Mirror direction, always present
    pub reflected: Ray,
    /// Transmitted ray, `None` under total internal reflection
    pub refracted: Option<Ray>,
    /// Fraction of energy carried by the reflected ray, in `[0, 1]`
    pub reflectance: f32,
    /// Applied to both branches
    pub attenuation: Color,
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, PartialEq)]
pub struct PhongDielectric {
    /// Phong coefficients; the diffuse term mirrors `attenuation`
    pub phong: PhongMaterial,
    /// Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub ior: f32,
    pub attenuation: Color,
}

impl PhongDielectric {
    pub fn new(ior: f32, attenuation: Color) -> Self {
        Self {
            phong: PhongMaterial {
                diffuse: attenuation,
                ..Default::default()
            },
            ior,
            attenuation,
        }
    }

    /// Schlick's approximation for the Fresnel reflectance going from a
    /// medium with index `n1` into one with index `n2`.
    pub fn schlick_reflectance(cos_theta: f32, n1: f32, n2: f32) -> f32 {
        let r0 = ((n2 - n1) / (n2 + n1)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5)
    }

    /// Split an incoming ray into reflected and refracted parts.
    pub fn scatter(&self, ray_in: &Ray, rec: &HitRecord) -> Scatter {
        // Leaving the medium when the back face was hit
        let (n1, n2) = if rec.front_face {
            (1.0, self.ior)
        } else {
            (self.ior, 1.0)
        };

        let d = ray_in.direction().normalize();
        let n = rec.normal.normalize();
        let d_dot_n = d.dot(n);
        let cos_theta_i = (-d_dot_n).clamp(0.0, 1.0);
        let sin_theta_i = (1.0 - cos_theta_i * cos_theta_i).sqrt();

        let ratio = n1 / n2;
        let (refracted, reflectance) = if ratio * sin_theta_i > 1.0 {
            // Total internal reflection
            (None, 1.0)
        } else {
            let k = 1.0 - ratio * ratio * (1.0 - d_dot_n * d_dot_n);
            let direction = ratio * (d - d_dot_n * n) - k.max(0.0).sqrt() * n;
            (
                Some(Ray::new(rec.point, direction)),
                Self::schlick_reflectance(cos_theta_i, n1, n2),
            )
        };

        Scatter {
            reflected: Ray::new(rec.point, reflect(d, n)),
            refracted,
            reflectance,
            attenuation: self.attenuation,
        }
    }
}

/// The closed set of materials a surface can reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Phong(PhongMaterial),
    Dielectric(PhongDielectric),
}

impl Material {
    /// Phong coefficients seen by the lights.
    ///
    /// Every variant is Phong-family today; a future non-Phong variant
    /// answers `None` and receives no direct lighting.
    pub fn phong(&self) -> Option<&PhongMaterial> {
        match self {
            Material::Phong(phong) => Some(phong),
            Material::Dielectric(dielectric) => Some(&dielectric.phong),
        }
    }

    pub fn as_dielectric(&self) -> Option<&PhongDielectric> {
        match self {
            Material::Dielectric(dielectric) => Some(dielectric),
            Material::Phong(_) => None,
        }
    }
}

impl From<PhongMaterial> for Material {
    fn from(material: PhongMaterial) -> Self {
        Material::Phong(material)
    }
}

impl From<PhongDielectric> for Material {
    fn from(material: PhongDielectric) -> Self {
        Material::Dielectric(material)
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
