// Render a scene file to an image.
// Run with: cargo run --release -- <scene.json> [output.png] [--mode <mode>] [--spp N] [--photons N] [--seed N]

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use lumen_core::load_description;
use lumen_renderer::{render_scene, Camera, PhotonSettings, RenderConfig, RenderMode, Scene};

/// Render a Lumen scene file. Options override the scene file.
#[derive(Parser, Debug, Default)]
#[command(name = "lumen", version, about = "Stochastic ray tracer with photon-mapped caustics")]
struct Cli {
    /// Scene description (JSON)
    scene: PathBuf,

    /// Output image; the extension picks the format
    #[arg(default_value = "render.png")]
    output: PathBuf,

    /// whitted_specular, monte_carlo or caustics
    #[arg(short, long)]
    mode: Option<RenderMode>,

    /// Samples per pixel
    #[arg(long)]
    spp: Option<u32>,

    /// Photons to emit for the caustics map
    #[arg(long)]
    photons: Option<usize>,

    /// Base random seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(args: &Cli) -> Result<()> {
    let start = Instant::now();

    let mut description = load_description(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    if let Some(photons) = args.photons {
        description.photons.count = photons;
    }

    let base_dir = args.scene.parent().unwrap_or_else(|| Path::new("."));
    let scene = Scene::from_description(&description, base_dir)
        .with_context(|| format!("Failed to build scene {}", args.scene.display()))?;

    let mut config = RenderConfig::from_description(&description.render)
        .context("Invalid render section")?;
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(spp) = args.spp {
        config.samples_per_pixel = spp;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if !config.mode.is_viewer_mode() {
        bail!("{} mode does not produce an image", config.mode);
    }

    let camera = Camera::from_description(&description.camera);
    let photons = PhotonSettings::from_description(&description.photons, config.seed);

    log::info!("Scene ready in {:.2}s", start.elapsed().as_secs_f32());

    let image = render_scene(&scene, &camera, &config, &photons);
    image
        .save(&args.output, config.gamma)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!(
        "Wrote {} ({:.2}s total)",
        args.output.display(),
        start.elapsed().as_secs_f32()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("lumen").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["scene.json"]).unwrap();
        assert_eq!(args.scene, PathBuf::from("scene.json"));
        assert_eq!(args.output, PathBuf::from("render.png"));
        assert_eq!(args.mode, None);
    }

    #[test]
    fn test_overrides() {
        let args = parse(&[
            "--mode", "caustics", "scene.json", "out.ppm", "--spp", "64", "--photons", "5000",
            "--seed", "7",
        ])
        .unwrap();
        assert_eq!(args.output, PathBuf::from("out.ppm"));
        assert_eq!(args.mode, Some(RenderMode::Caustics));
        assert_eq!(args.spp, Some(64));
        assert_eq!(args.photons, Some(5000));
        assert_eq!(args.seed, Some(7));

        let short = parse(&["scene.json", "-m", "monte-carlo"]).unwrap();
        assert_eq!(short.mode, Some(RenderMode::MonteCarlo));
    }

    #[test]
    fn test_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["scene.json", "--spp"]).is_err());
        assert!(parse(&["scene.json", "--spp", "many"]).is_err());
        assert!(parse(&["scene.json", "--mode", "radiosity"]).is_err());
        assert!(parse(&["scene.json", "--verbose"]).is_err());
        assert!(parse(&["a.json", "b.png", "c.png"]).is_err());
    }

    #[test]
    fn test_run_writes_image() {
        let dir = std::env::temp_dir().join(format!("lumen_cli_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        std::fs::write(
            dir.join("quad.obj"),
            "v -1 0 -1\nv 1 0 -1\nv 1 0 1\nv -1 0 1\nf 1 3 2\nf 1 4 3\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("scene.json"),
            r#"{
                "camera": { "look_from": [0, 2, 3], "look_at": [0, 0, 0], "width": 16, "height": 12 },
                "render": { "samples_per_pixel": 2, "bucket_size": 8 },
                "materials": { "white": { "color_diffuse": [1, 1, 1] } },
                "objects": [
                    { "type": "mesh", "path": "quad.obj", "material": "white" },
                    { "type": "sphere", "center": [0, 0.5, 0], "radius": 0.5, "material": "white" }
                ],
                "lights": [ { "p0": [-0.5, 3, -0.5], "p1": [0.5, 3, -0.5], "p2": [-0.5, 3, 0.5], "flux": 20 } ]
            }"#,
        )
        .unwrap();

        let args = Cli {
            scene: dir.join("scene.json"),
            output: dir.join("out.png"),
            seed: Some(3),
            ..Default::default()
        };
        run(&args).unwrap();
        assert!(dir.join("out.png").exists());

        let photon_mode = Cli {
            mode: Some(RenderMode::PhotonMapping),
            ..args
        };
        assert!(run(&photon_mode).is_err());

        let missing = Cli {
            scene: dir.join("missing.json"),
            ..Default::default()
        };
        assert!(run(&missing).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
