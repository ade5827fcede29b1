// Render a scene file to an image.
// Run with: cargo run --release -- -s scene.scn -o out.png

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use specula_renderer::{RayTracer, RenderConfig};
use specula_scene::load_scene;

const USAGE: &str = "\
Usage: specula -s <scene> -o <output> [options]

Options:
  -s, --scene <path>       scene file to render
  -o, --output <path>      output image (.exr writes linear floats)
  -g, --gamma <value>      display gamma for 8-bit output [default: 2.0]
  -d, --max-depth <n>      maximum reflection/refraction depth [default: 5]
      --height <pixels>    image height [default: taken from the scene camera]
  -h, --help               print this message";

#[derive(Debug, Clone, PartialEq)]
struct Args {
    scene: PathBuf,
    output: PathBuf,
    gamma: f32,
    max_depth: u32,
    height: Option<u32>,
}

/// What the command line asked for.
#[derive(Debug, PartialEq)]
enum Command {
    Render(Args),
    Help,
}

fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut scene = None;
    let mut output = None;
    let mut gamma = 2.0;
    let mut max_depth = RenderConfig::default().max_depth;
    let mut height = None;

    let mut args = args.into_iter();
    while let Some(flag) = args.next() {
        let mut value = || {
            args.next()
                .ok_or_else(|| anyhow!("missing value for {}", flag))
        };
        match flag.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-s" | "--scene" => scene = Some(PathBuf::from(value()?)),
            "-o" | "--output" => output = Some(PathBuf::from(value()?)),
            "-g" | "--gamma" => {
                let v = value()?;
                gamma = v
                    .parse::<f32>()
                    .with_context(|| format!("invalid gamma {:?}", v))?;
            }
            "-d" | "--max-depth" => {
                let v = value()?;
                max_depth = v
                    .parse::<u32>()
                    .with_context(|| format!("invalid max depth {:?}", v))?;
            }
            "--height" => {
                let v = value()?;
                height = Some(
                    v.parse::<u32>()
                        .with_context(|| format!("invalid height {:?}", v))?,
                );
            }
            other => bail!("unknown argument {:?}", other),
        }
    }

    Ok(Command::Render(Args {
        scene: scene.context("missing required --scene")?,
        output: output.context("missing required --output")?,
        gamma,
        max_depth,
        height,
    }))
}

fn run(args: Args) -> Result<()> {
    let loaded = load_scene(&args.scene)
        .with_context(|| format!("failed to load scene {}", args.scene.display()))?;

    let height = args.height.unwrap_or(loaded.image_size.1);
    let config = RenderConfig::default()
        .with_image_height(height)
        .with_max_depth(args.max_depth);

    let mut tracer = RayTracer::new(config);
    tracer
        .render(&loaded.scene)
        .context("render failed")?;
    tracer
        .write_image(&args.output, args.gamma)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    match parse_args(std::env::args().skip(1)) {
        Ok(Command::Help) => {
            println!("{}", USAGE);
            Ok(())
        }
        Ok(Command::Render(args)) => run(args),
        Err(e) => {
            eprintln!("{}\n", USAGE);
            Err(e)
        }
    }
}
