//! Tessera Runtime
//!
//! Headless binary: loads settings, boots the scripted scene and steps it
//! at a fixed tick rate.
//!
//! Usage: `tessera [settings.json]`

use anyhow::{Context, Result};
use tessera_core::time::SimulationTime;
use tessera_script::ScriptableScene;
use tessera_services::Settings;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let settings = match std::env::args_os().nth(1) {
        Some(path) => Settings::load(&path)
            .with_context(|| format!("loading settings from {}", path.to_string_lossy()))?,
        None => Settings::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log.filter)),
        )
        .init();

    tracing::info!("Tessera v{}", tessera_core::VERSION);

    let mut scene = ScriptableScene::new(&settings.scene.script, &settings.scene.asset_root);
    if let Some(manifest) = &settings.scene.texture_manifest {
        scene = scene.with_texture_manifest(manifest);
    }
    scene
        .init()
        .with_context(|| format!("initializing scene {}", settings.scene.script.display()))?;

    let mut time = SimulationTime::with_tick_rate(settings.simulation.tick_rate_hz);
    let dt = time.tick_seconds();

    for _ in 0..settings.simulation.max_ticks {
        scene.update(dt).context("scene update failed")?;
        let draws = scene.render().context("scene render failed")?;
        time.advance_tick();

        for draw in &draws {
            tracing::debug!(
                tick = time.tick_count(),
                entity = draw.entity,
                texture = %draw.texture_id,
                x = draw.position.x,
                y = draw.position.y,
                frame = draw.frame,
                "sprite"
            );
        }
    }

    let entities = scene.entities().map(|em| em.entity_count()).unwrap_or(0);
    tracing::info!(
        ticks = time.tick_count(),
        simulated_secs = time.total_time().as_secs_f32(),
        entities,
        "simulation finished"
    );

    scene.cleanup().context("scene cleanup failed")?;
    Ok(())
}
