//! Headless demo runner.
//!
//! Builds a map with random debris, replays a scripted walk through the
//! scheduler, and prints the final console frame.
//!
//! Settings come from `RLK_*` environment variables (see `DemoConfig`).
//! Logging is controlled with `RUST_LOG`.

use std::io::{self, Write};

use rand::{SeedableRng, rngs::StdRng};
use rlk_demo::{BufferConsole, DemoConfig, Game, TileMap};
use rlk_spatial::VisibilityMap;
use tracing::info;

fn main() -> eyre::Result<()> {
    // Logs go to stderr so stdout carries only the frame
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rlk_demo=info".parse()?)
                .add_directive("rlk_tick=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    let config = DemoConfig::from_env()?;
    info!(
        frames = config.frames,
        frame_ms = config.frame_ms,
        seed = config.seed,
        "starting demo"
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let map = TileMap::with_debris(config.map_width, config.map_height, &mut rng, 4);
    let console = BufferConsole::new(config.console_width, config.console_height);
    let mut game = Game::new(map, console, config.input());

    let mut scheduler = rlk_demo::scheduler(&config);
    scheduler.configure(&mut game)?;
    for _ in 0..config.frames {
        scheduler.tick(&mut game, config.frame_ms)?;
    }

    if let Some((_, pos)) = game.player() {
        let visibility = game.world.resource_or_err::<VisibilityMap>()?;
        info!(
            x = pos.x,
            y = pos.y,
            frames = scheduler.frame(),
            visible = visibility.visible_count(),
            revealed = visibility.revealed_count(),
            "demo finished"
        );
    }

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", game.console.render_to_string())?;
    Ok(())
}
