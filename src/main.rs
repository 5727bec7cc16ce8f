use anyhow::{Context, Result};
use glam::Vec2;

use lightgraph::backend::LogBackend;
use lightgraph::SceneConfig;

mod demo;
mod engine;

const FRAME_COUNT: u32 = 120;
const FRAME_TIME: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load(&path)
            .with_context(|| format!("Failed to load scene config from {}", path))?,
        None => SceneConfig::default(),
    };

    let mut state = demo::DemoState::new(config)?;
    let mut backend = LogBackend::new();
    let resolution = Vec2::new(1280.0, 720.0);

    for frame in 0..FRAME_COUNT {
        let stats = engine::render_frame(
            &mut state,
            frame as f32 * FRAME_TIME,
            resolution,
            &mut backend,
        )?;
        log::debug!("frame {}: {:?}", frame, stats);
    }

    log::info!(
        "rendered {} frames: {} draws, {} indices",
        FRAME_COUNT,
        backend.draw_count,
        backend.index_count
    );

    Ok(())
}
