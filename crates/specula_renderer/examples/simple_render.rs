//! Simple Whitted ray tracer example.
//!
//! Builds a small scene in code (a mirror floor, a glass ball and a matte
//! ball) and writes it to `simple_render.png`.

use specula_renderer::{
    Camera, Color, Light, PhongDielectric, PhongMaterial, RayTracer, RenderConfig, SceneBuilder,
    Sphere, Surface, Triangle, Vec3,
};

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let start = std::time::Instant::now();
    let mut builder = SceneBuilder::new();

    let floor = builder.add_material(PhongMaterial::new(
        Color::splat(0.05),
        Color::splat(0.3),
        Color::splat(0.2),
        50.0,
        Color::splat(0.4),
    ));
    let matte = builder.add_material(PhongMaterial::new(
        Color::new(0.1, 0.02, 0.02),
        Color::new(0.8, 0.2, 0.2),
        Color::splat(0.5),
        100.0,
        Color::ZERO,
    ));
    let glass = builder.add_material(PhongDielectric::new(1.5, Color::new(0.95, 1.0, 0.95)));

    let corners = [
        Vec3::new(-10.0, 0.0, 10.0),
        Vec3::new(10.0, 0.0, 10.0),
        Vec3::new(10.0, 0.0, -10.0),
        Vec3::new(-10.0, 0.0, -10.0),
    ];
    let surfaces: [Surface; 4] = [
        Triangle::new([corners[0], corners[1], corners[2]])
            .with_material(floor)
            .into(),
        Triangle::new([corners[0], corners[2], corners[3]])
            .with_material(floor)
            .into(),
        Sphere::new(Vec3::new(-1.2, 1.0, -1.0), 1.0)
            .with_material(matte)
            .into(),
        Sphere::new(Vec3::new(1.2, 1.0, 0.0), 1.0)
            .with_material(glass)
            .into(),
    ];
    for surface in surfaces {
        builder.add_surface(surface).expect("surface has a material");
    }

    builder
        .add_light(Light::point(Vec3::new(4.0, 6.0, 4.0), Color::splat(60.0)))
        .expect("first point light");
    builder
        .add_light(Light::ambient(Color::splat(0.5)))
        .expect("single ambient light");

    let camera = Camera::new(
        Vec3::new(0.0, 2.0, 6.0),
        Vec3::new(0.0, 0.8, 0.0),
        Vec3::Y,
        45.0,
        16.0 / 9.0,
    );
    let scene = builder.build(camera);
    println!("Scene built in {:?}", start.elapsed());

    let mut tracer = RayTracer::new(RenderConfig::default().with_image_height(360));
    tracer.render(&scene).expect("render failed");

    let filename = "simple_render.png";
    tracer
        .write_image(filename, 2.2)
        .expect("Failed to save image");
    println!("Saved to {}", filename);
}
