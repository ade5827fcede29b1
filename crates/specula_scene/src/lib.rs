//! Specula scene files.
//!
//! A scene file is line-oriented text. The first character of each line
//! selects a command:
//!
//! - `s x y z r` sphere
//! - `t ax ay az bx by bz cx cy cz` triangle
//! - `m dr dg db sr sg sb p ir ig ib` Phong material
//! - `d ior ar ag ab` dielectric material
//! - `c x y z vx vy vz d iw ih pw ph` camera
//! - `l p x y z r g b` point light, `l a r g b` ambient light
//!
//! Surfaces use the most recent material. Lines starting with `/` are
//! comments and unknown commands are skipped.
//!
//! # Example
//!
//! ```ignore
//! use specula_scene::load_scene;
//!
//! let loaded = load_scene("scenes/spheres.scn")?;
//! println!("{} surfaces", loaded.scene.surface_count());
//! ```

mod loader;
mod parser;

pub use loader::*;
pub use parser::*;
