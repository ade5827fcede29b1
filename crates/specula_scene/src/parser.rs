//! Scene file parser.
//!
//! Parsing is line by line. Each command line is split on whitespace and
//! its numeric fields are read as `f32`; trailing extra fields are ignored.

use log::{debug, info, warn};
use specula_math::{Vec3, EPSILON};
use specula_renderer::{
    Camera, Color, Light, MaterialId, PhongDielectric, PhongMaterial, Scene, SceneBuilder,
    SceneError, Sphere, Triangle,
};
use thiserror::Error;

/// Aspect ratios above this are accepted but reported.
const MAX_SANE_ASPECT: f32 = 20000.0;

/// Floor for the ambient coefficient derived from a material's diffuse color.
const MIN_AMBIENT: f32 = 0.01;

/// Errors that can occur while reading a scene file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: '{command}' expects {expected} values, found {found}")]
    MissingFields {
        line: usize,
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: surface appears before any material")]
    NoMaterial { line: usize },

    #[error("line {line}: invalid camera: {message}")]
    InvalidCamera { line: usize, message: String },

    #[error("scene file must contain exactly one camera, found {0}")]
    CameraCount(usize),

    #[error("line {line}: scene file may contain only one ambient light")]
    MultipleAmbientLights { line: usize },

    #[error("line {line}: {source}")]
    Scene {
        line: usize,
        #[source]
        source: SceneError,
    },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A parsed scene together with the requested output size.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub scene: Scene,
    /// `(width, height)` in pixels as written in the camera line
    pub image_size: (u32, u32),
}

/// Scene file parser.
#[derive(Debug, Default)]
pub struct SceneParser {
    builder: SceneBuilder,
    current_material: Option<MaterialId>,
    camera: Option<(Camera, (u32, u32))>,
    camera_count: usize,
    point_lights: usize,
}

impl SceneParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a complete scene file.
    pub fn parse(mut self, content: &str) -> ParseResult<LoadedScene> {
        for (index, line) in content.lines().enumerate() {
            self.parse_line(index + 1, line)?;
        }
        self.finish()
    }

    fn parse_line(&mut self, line_no: usize, line: &str) -> ParseResult<()> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('/') {
            return Ok(());
        }

        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return Ok(());
        };
        let args: Vec<&str> = tokens.collect();

        match command {
            "s" => self.parse_sphere(line_no, &args),
            "t" => self.parse_triangle(line_no, &args),
            "m" => self.parse_material(line_no, &args),
            "d" => self.parse_dielectric(line_no, &args),
            "c" => self.parse_camera(line_no, &args),
            "l" => self.parse_light(line_no, &args),
            other => {
                debug!("line {}: skipping unknown command {:?}", line_no, other);
                Ok(())
            }
        }
    }

    fn material_for_surface(&self, line: usize) -> ParseResult<MaterialId> {
        self.current_material.ok_or(ParseError::NoMaterial { line })
    }

    fn parse_sphere(&mut self, line: usize, args: &[&str]) -> ParseResult<()> {
        let [x, y, z, r] = parse_floats(line, "s", args)?;
        let material = self.material_for_surface(line)?;

        let sphere = Sphere::new(Vec3::new(x, y, z), r).with_material(material);
        self.builder
            .add_surface(sphere)
            .map_err(|source| ParseError::Scene { line, source })
    }

    fn parse_triangle(&mut self, line: usize, args: &[&str]) -> ParseResult<()> {
        let [ax, ay, az, bx, by, bz, cx, cy, cz] = parse_floats(line, "t", args)?;
        let material = self.material_for_surface(line)?;

        let triangle = Triangle::new([
            Vec3::new(ax, ay, az),
            Vec3::new(bx, by, bz),
            Vec3::new(cx, cy, cz),
        ])
        .with_material(material);
        self.builder
            .add_surface(triangle)
            .map_err(|source| ParseError::Scene { line, source })
    }

    fn parse_material(&mut self, line: usize, args: &[&str]) -> ParseResult<()> {
        let [dr, dg, db, sr, sg, sb, shininess, ir, ig, ib] = parse_floats(line, "m", args)?;

        let diffuse = Color::new(dr, dg, db);
        let material = PhongMaterial::new(
            diffuse.max(Color::splat(MIN_AMBIENT)),
            diffuse,
            Color::new(sr, sg, sb),
            shininess,
            Color::new(ir, ig, ib),
        );
        self.current_material = Some(self.builder.add_material(material));
        Ok(())
    }

    fn parse_dielectric(&mut self, line: usize, args: &[&str]) -> ParseResult<()> {
        let [ior, ar, ag, ab] = parse_floats(line, "d", args)?;

        let material = PhongDielectric::new(ior, Color::new(ar, ag, ab));
        self.current_material = Some(self.builder.add_material(material));
        Ok(())
    }

    fn parse_camera(&mut self, line: usize, args: &[&str]) -> ParseResult<()> {
        let [x, y, z, vx, vy, vz, focal_length, view_w, view_h, pixels_w, pixels_h] =
            parse_floats(line, "c", args)?;

        let eye = Vec3::new(x, y, z);
        let view = Vec3::new(vx, vy, vz).normalize_or_zero();
        if view == Vec3::ZERO {
            return Err(ParseError::InvalidCamera {
                line,
                message: "view direction is zero".to_string(),
            });
        }
        let up = if view.abs_diff_eq(Vec3::Y, EPSILON) {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let fovy = (2.0 * (view_h * 0.5).atan2(focal_length)).to_degrees();

        let aspect = view_w / view_h;
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(ParseError::InvalidCamera {
                line,
                message: format!("bad viewport aspect ratio {}", aspect),
            });
        }
        if aspect > MAX_SANE_ASPECT {
            warn!("line {}: camera has very large aspect ratio {}", line, aspect);
        }
        let image_aspect = pixels_w / pixels_h;
        if (aspect - image_aspect).abs() > EPSILON {
            warn!(
                "line {}: viewport aspect {} differs from image aspect {}; \
                 output width will follow the viewport aspect",
                line, aspect, image_aspect
            );
        }

        let camera = Camera::new(eye, eye + view, up, fovy, aspect);
        // Float to int casts saturate, so negative sizes become zero
        self.camera = Some((camera, (pixels_w as u32, pixels_h as u32)));
        self.camera_count += 1;
        Ok(())
    }

    fn parse_light(&mut self, line: usize, args: &[&str]) -> ParseResult<()> {
        let Some((&kind, rest)) = args.split_first() else {
            return Err(ParseError::MissingFields {
                line,
                command: "l",
                expected: 1,
                found: 0,
            });
        };

        let light = match kind {
            "p" => {
                let [x, y, z, r, g, b] = parse_floats(line, "l p", rest)?;
                self.point_lights += 1;
                Light::point(Vec3::new(x, y, z), Color::new(r, g, b))
            }
            "a" => {
                let [r, g, b] = parse_floats(line, "l a", rest)?;
                Light::ambient(Color::new(r, g, b))
            }
            other => {
                warn!("line {}: skipping unknown light type {:?}", line, other);
                return Ok(());
            }
        };

        self.builder.add_light(light).map_err(|source| match source {
            SceneError::MultipleAmbientLights => ParseError::MultipleAmbientLights { line },
            source => ParseError::Scene { line, source },
        })
    }

    fn finish(self) -> ParseResult<LoadedScene> {
        let (camera, image_size) = match (self.camera_count, self.camera) {
            (1, Some(camera)) => camera,
            (count, _) => return Err(ParseError::CameraCount(count)),
        };

        if self.builder.surface_count() == 0 {
            warn!("Scene file does not contain any surfaces");
        }
        info!(
            "Read {} surface(s), {} material(s), & {} point light(s)",
            self.builder.surface_count(),
            self.builder.material_count(),
            self.point_lights
        );

        Ok(LoadedScene {
            scene: self.builder.build(camera),
            image_size,
        })
    }
}

/// Read exactly `N` leading numbers from `args`.
fn parse_floats<const N: usize>(
    line: usize,
    command: &'static str,
    args: &[&str],
) -> ParseResult<[f32; N]> {
    if args.len() < N {
        return Err(ParseError::MissingFields {
            line,
            command,
            expected: N,
            found: args.len(),
        });
    }

    let mut values = [0.0; N];
    for (value, token) in values.iter_mut().zip(args) {
        *value = token.parse().map_err(|_| ParseError::InvalidNumber {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(values)
}

/// Parse scene file contents.
pub fn parse_scene(content: &str) -> ParseResult<LoadedScene> {
    SceneParser::new().parse(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use specula_renderer::{Hittable, Interval, Material, Ray, Surface};

    const CAMERA: &str = "c 0 0 0  0 0 -1  1  2 1  200 100";

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_parse_full_scene() {
        let src = r#"
/ a comment line
c 0 1 5  0 0 -1  1  1 1  64 64

m 0.5 0.2 0.0  0.3 0.3 0.3  20  0 0 0
s 0 0 -3 1
d 1.5 1 0.9 1
t -1 0 -1  1 0 -1  0 1 -1

l p 0 10 0  50 50 50
l a 0.1 0.1 0.1
x unknown command
"#;
        let loaded = parse_scene(src).unwrap();
        let scene = &loaded.scene;

        assert_eq!(loaded.image_size, (64, 64));
        assert_eq!(scene.surface_count(), 2);
        assert_eq!(scene.materials.len(), 2);
        assert_eq!(scene.lights.len(), 2);

        let Material::Phong(phong) = &scene.materials[0] else {
            panic!("expected Phong material");
        };
        assert_eq!(phong.diffuse, Color::new(0.5, 0.2, 0.0));
        assert_eq!(phong.ambient, Color::new(0.5, 0.2, 0.01));
        assert_eq!(phong.shininess, 20.0);

        let glass = scene.materials[1].as_dielectric().unwrap();
        assert_eq!(glass.ior, 1.5);
        assert_eq!(glass.attenuation, Color::new(1.0, 0.9, 1.0));
    }

    #[test]
    fn test_surfaces_take_current_material() {
        let src = format!("{CAMERA}\nm 1 1 1 0 0 0 1 0 0 0\ns 0 0 -5 1\nd 1.3 1 1 1\ns 3 0 -5 1\n");
        let loaded = parse_scene(&src).unwrap();

        let Surface::List(list) = &loaded.scene.root else {
            panic!("root should be a list");
        };
        let materials: Vec<_> = list.iter().map(Surface::material).collect();
        assert_eq!(materials, vec![Some(MaterialId(0)), Some(MaterialId(1))]);
    }

    #[test]
    fn test_camera_parameters() {
        // focal length 1, viewport 2 x 1: fovy = 2 atan(0.5)
        let loaded = parse_scene(CAMERA).unwrap();
        let camera = &loaded.scene.camera;

        assert!((camera.fovy() - 2.0 * 0.5f32.atan().to_degrees()).abs() < 1e-3);
        assert_eq!(camera.aspect_ratio(), 2.0);
        assert!(approx(camera.target(), Vec3::NEG_Z));
        assert!(approx(camera.up(), Vec3::Y));
        assert_eq!(loaded.image_size, (200, 100));
    }

    #[test]
    fn test_camera_looking_up_uses_z_up() {
        let loaded = parse_scene("c 1 2 3  0 5 0  1  1 1  10 10").unwrap();
        let camera = &loaded.scene.camera;

        assert!(approx(camera.up(), Vec3::Z));
        assert!(approx(camera.target(), Vec3::new(1.0, 3.0, 3.0)));
        assert!(camera.validate().is_ok());
    }

    #[test]
    fn test_camera_ray_matches_view() {
        let loaded = parse_scene("c 0 0 0  1 0 0  1  1 1  10 10\nm 1 1 1 0 0 0 1 0 0 0\ns 5 0 0 1").unwrap();
        let scene = &loaded.scene;

        let ray = scene.camera.get_ray(0.5, 0.5);
        assert!(approx(ray.direction().normalize(), Vec3::X));
        assert!(scene.root.hit(&ray, Interval::from_epsilon()).is_some());
        let back = Ray::new(Vec3::ZERO, Vec3::NEG_X);
        assert!(scene.hit(&back, Interval::from_epsilon()).is_none());
    }

    #[test]
    fn test_bad_aspect_is_an_error() {
        let err = parse_scene("c 0 0 0  0 0 -1  1  1 0  10 10").unwrap_err();
        assert!(matches!(err, ParseError::InvalidCamera { line: 1, .. }));

        let err = parse_scene("c 0 0 0  0 0 -1  1  -1 1  10 10").unwrap_err();
        assert!(matches!(err, ParseError::InvalidCamera { .. }));
    }

    #[test]
    fn test_zero_view_is_an_error() {
        let err = parse_scene("c 0 0 0  0 0 0  1  1 1  10 10").unwrap_err();
        assert!(matches!(err, ParseError::InvalidCamera { .. }));
    }

    #[test]
    fn test_aspect_mismatch_is_accepted() {
        let loaded = parse_scene("c 0 0 0  0 0 -1  1  1 1  300 100").unwrap();
        assert_eq!(loaded.scene.camera.aspect_ratio(), 1.0);
        assert_eq!(loaded.image_size, (300, 100));
    }

    #[test]
    fn test_camera_count() {
        assert!(matches!(
            parse_scene("m 1 1 1 0 0 0 1 0 0 0\n").unwrap_err(),
            ParseError::CameraCount(0)
        ));

        let two = format!("{CAMERA}\n{CAMERA}\n");
        assert!(matches!(
            parse_scene(&two).unwrap_err(),
            ParseError::CameraCount(2)
        ));
    }

    #[test]
    fn test_surface_before_material() {
        let src = format!("{CAMERA}\n\ns 0 0 -5 1\n");
        assert!(matches!(
            parse_scene(&src).unwrap_err(),
            ParseError::NoMaterial { line: 3 }
        ));

        let src = format!("{CAMERA}\nt 0 0 0 1 0 0 0 1 0\n");
        assert!(matches!(
            parse_scene(&src).unwrap_err(),
            ParseError::NoMaterial { line: 2 }
        ));
    }

    #[test]
    fn test_second_ambient_light() {
        let src = format!("{CAMERA}\nl a 0.1 0.1 0.1\nl p 0 0 0 1 1 1\nl a 0.2 0.2 0.2\n");
        assert!(matches!(
            parse_scene(&src).unwrap_err(),
            ParseError::MultipleAmbientLights { line: 4 }
        ));
    }

    #[test]
    fn test_malformed_lines() {
        let src = format!("{CAMERA}\nm 1 1 1 0 0 0 1 0 0 0\ns 0 0 -5\n");
        assert!(matches!(
            parse_scene(&src).unwrap_err(),
            ParseError::MissingFields {
                line: 3,
                expected: 4,
                found: 3,
                ..
            }
        ));

        let src = format!("{CAMERA}\nm 1 1 1 0 0 0 1 0 0 0\ns 0 zero -5 1\n");
        let err = parse_scene(&src).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 3, .. }));
        assert!(err.to_string().contains("zero"));

        let src = format!("{CAMERA}\nl\n");
        assert!(matches!(
            parse_scene(&src).unwrap_err(),
            ParseError::MissingFields { command: "l", .. }
        ));
    }

    #[test]
    fn test_empty_scene_only_warns() {
        let loaded = parse_scene(CAMERA).unwrap();
        assert_eq!(loaded.scene.surface_count(), 0);
        assert!(loaded.scene.lights.is_empty());
    }

    #[test]
    fn test_unknown_light_type_is_skipped() {
        let src = format!("{CAMERA}\nl d 0 -1 0 1 1 1\n");
        let loaded = parse_scene(&src).unwrap();
        assert!(loaded.scene.lights.is_empty());
    }
}
