//! # Desk Scene
//!
//! Opens a window showing the desk scene: a wooden table against a drywall
//! wall with a window, a basketball, a laptop and a coffee mug.
//!
//! ## Controls
//!
//! - `P` / `O`: perspective / orthographic projection
//! - Left drag: orbit, `Shift` + left drag: pan
//! - Wheel: zoom, `Shift` + wheel: movement speed
//! - `W` `A` `S` `D`: move, `Q` / `E`: up / down
//! - `Escape`: quit
//!
//! ## Usage
//!
//! Run with: `cargo run --example desk`
//!
//! With `--dry-run` the scene is prepared and walked once against the
//! recording backends and the draw list is logged; no window or GPU is used.
//!
//! Texture files are read from `./textures` unless `DESK_SCENE_TEXTURES`
//! points elsewhere.

use desk_scene::prelude::*;
use desk_scene::scene::recording::{HeadlessTextures, RecordingMeshes, RecordingShader};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    let mut logging = LoggingConfig::default();
    if let Some(filter) = config.log_filter.as_deref() {
        logging = logging.with_filter(filter);
    }
    init_logging(logging);

    if std::env::args().skip(1).any(|arg| arg == "--dry-run") {
        return dry_run(&config);
    }

    log::info!("Loading textures from {}", config.texture_dir.display());
    DeskApp::new(config)?.run()
}

fn dry_run(config: &AppConfig) -> anyhow::Result<()> {
    let definition = desk_scene(&config.texture_dir);
    let textures = TextureRegistry::new(HeadlessTextures::new(), config.max_texture_slots);

    let mut scene = SceneManager::new(
        definition,
        Some(RecordingShader::new()),
        RecordingMeshes::new(),
        textures,
    )
    .with_binder(ShaderStateBinder::new(config.missing_texture_color.into()))
    .with_projection_mode(config.projection_mode)
    .with_aspect_ratio(config.aspect_ratio());

    let report = scene.prepare()?;
    for (tag, slot) in &report.loaded_textures {
        log::info!("texture '{}' -> slot {}", tag, slot);
    }
    for (tag, reason) in &report.failed_textures {
        log::warn!("texture '{}' failed: {}", tag, reason);
    }

    let stats = scene.render()?;
    for (index, draw) in scene.meshes_mut().take_draws().iter().enumerate() {
        log::info!(
            "draw {:>2}: {:<8} textured={}",
            index,
            draw.mesh.name(),
            draw.uses_texture()
        );
    }

    log::info!(
        "{} draws, {} texture fallbacks, {} material misses",
        stats.draws,
        stats.texture_fallbacks,
        stats.material_misses
    );
    Ok(())
}
