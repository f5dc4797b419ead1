//! The demo's four systems, registered in this order:
//!
//! 1. [`PlayerSystem`] turns input into movement
//! 2. [`VisibilitySystem`] recomputes what the player can see
//! 3. [`CameraSystem`] redraws the map around the player
//! 4. [`ActorRenderSystem`] draws visible entities over the map

use rlk_ecs::EcsError;
use rlk_event::EventWorldExt;
use rlk_spatial::{FieldOfView, VisibilityMap};
use rlk_tick::{System, SystemError};
use tracing::{debug, trace};

use crate::{
    camera::Camera,
    components::{Player, PlayerMoved, Position, Renderable, Viewshed},
    console::{Color, Console, Glyph},
    game::{Game, player_position},
    input::{InputSource, Intent},
    map::TileMap,
};

/// Moves the player one tile per accepted intent.
///
/// After a move, input is ignored until `repeat_delay_ms` has passed. Waits
/// and steps into walls or off the map are dropped without starting the
/// delay, so the next intent is read on the following frame.
#[derive(Debug, Clone)]
pub struct PlayerSystem {
    repeat_delay_ms: f64,
    since_last_ms: f64,
}

impl PlayerSystem {
    #[must_use]
    pub fn new(repeat_delay_ms: f64) -> Self {
        Self {
            repeat_delay_ms,
            since_last_ms: f64::INFINITY,
        }
    }
}

impl<C: Console, I: InputSource> System<Game<C, I>> for PlayerSystem {
    fn name(&self) -> &str {
        "player"
    }

    fn update(&mut self, game: &mut Game<C, I>, dt_ms: f64) -> Result<(), SystemError> {
        self.since_last_ms += dt_ms;
        if self.since_last_ms <= self.repeat_delay_ms {
            return Ok(());
        }
        let Some(intent) = game.input.next_intent() else {
            return Ok(());
        };

        let Intent::Move { dx, dy } = intent else {
            trace!("player waits");
            return Ok(());
        };

        let (player, from) = player_position(&game.world)?;
        let to = Position::new(from.x.saturating_add(dx), from.y.saturating_add(dy));
        if !game.world.resource_or_err::<TileMap>()?.is_walkable(to.x, to.y) {
            debug!(x = to.x, y = to.y, "move blocked");
            return Ok(());
        }

        if let Some(pos) = game.world.get_mut::<Position>(player) {
            *pos = to;
        }
        self.since_last_ms = 0.0;
        game.console.set_dirty(true);
        game.world.send_event(PlayerMoved {
            entity: player,
            from,
            to,
        });
        trace!(x = to.x, y = to.y, "player moved");
        Ok(())
    }
}

/// Recomputes visible tiles from every entity with a [`Viewshed`].
///
/// Runs on the first frame and after each [`PlayerMoved`].
#[derive(Debug, Default)]
pub struct VisibilitySystem {
    fov: FieldOfView,
    pending_sweep: bool,
}

impl VisibilitySystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Console, I: InputSource> System<Game<C, I>> for VisibilitySystem {
    fn name(&self) -> &str {
        "visibility"
    }

    fn configure(&mut self, game: &mut Game<C, I>) -> Result<(), SystemError> {
        let map = game.world.resource_or_err::<TileMap>()?;
        let (width, height) = (map.width(), map.height());
        game.world
            .resource_or_insert_with(|| VisibilityMap::new(width, height));
        game.world.init_events();
        self.pending_sweep = true;
        Ok(())
    }

    fn update(&mut self, game: &mut Game<C, I>, _dt_ms: f64) -> Result<(), SystemError> {
        let moved = game.world.drain_events::<PlayerMoved>().count() > 0;
        let initial = std::mem::take(&mut self.pending_sweep);
        if !moved && !initial {
            return Ok(());
        }

        let fov = &mut self.fov;
        let visible = game
            .world
            .resource_scope(|world, visibility: &mut VisibilityMap| {
                let map = world.resource_or_err::<TileMap>()?;
                visibility.clear_visible();

                let mut visible = 0;
                for (_, (pos, viewshed)) in world.query::<(Position, Viewshed)>() {
                    visible += fov.compute(
                        *pos,
                        viewshed.radius,
                        |tile: Position| map.is_opaque(tile.x, tile.y),
                        |tile: Position| {
                            visibility.reveal(tile.x, tile.y);
                        },
                    );
                }
                Ok::<_, EcsError>(visible)
            })
            .ok_or(EcsError::ResourceNotFound(std::any::type_name::<VisibilityMap>()))??;

        debug!(visible, "visibility updated");
        Ok(())
    }
}

/// Spawns the player and redraws the map around it when the console is dirty.
///
/// Revealed tiles are grey, tiles in view are white, and unexplored tiles a
/// dim `.`.
#[derive(Debug, Clone)]
pub struct CameraSystem {
    player_sight: u32,
}

impl CameraSystem {
    /// `player_sight` is the view radius given to the spawned player.
    #[must_use]
    pub const fn new(player_sight: u32) -> Self {
        Self { player_sight }
    }
}

impl<C: Console, I: InputSource> System<Game<C, I>> for CameraSystem {
    fn name(&self) -> &str {
        "camera"
    }

    fn configure(&mut self, game: &mut Game<C, I>) -> Result<(), SystemError> {
        let (x, y) = game.world.resource_or_err::<TileMap>()?.start();
        let player = game
            .world
            .spawn()
            .insert(Position::new(x, y))
            .insert(Renderable::new('@', Color::YELLOW))
            .insert(Player)
            .insert(Viewshed {
                radius: self.player_sight,
            })
            .id();

        debug!(%player, x, y, "spawned player");
        Ok(())
    }

    fn update(&mut self, game: &mut Game<C, I>, _dt_ms: f64) -> Result<(), SystemError> {
        if !game.console.is_dirty() {
            return Ok(());
        }

        let (_, pos) = player_position(&game.world)?;
        let camera = Camera::centered_on(pos.x, pos.y, game.console.width(), game.console.height());
        let map = game.world.resource_or_err::<TileMap>()?;
        let visibility = game.world.resource_or_err::<VisibilityMap>()?;

        game.console.clear();
        for (x, y) in camera.tiles() {
            let Some(tile) = map.tile(x, y) else {
                continue;
            };

            let mut glyph = Glyph::new('.', Color::DARKEST_GREY, Color::BLACK);
            if visibility.is_revealed(x, y) {
                glyph.ch = tile.glyph();
                glyph.fg = Color::GREY;
            }
            if visibility.is_visible(x, y) {
                glyph.fg = Color::WHITE;
            }
            game.console
                .set_char(x - camera.left_x, y - camera.top_y, glyph);
        }

        game.world.insert_resource(camera);
        Ok(())
    }
}

/// Draws every [`Renderable`] on a visible tile, then marks the console clean.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActorRenderSystem;

impl<C: Console, I: InputSource> System<Game<C, I>> for ActorRenderSystem {
    fn name(&self) -> &str {
        "actor_render"
    }

    fn update(&mut self, game: &mut Game<C, I>, _dt_ms: f64) -> Result<(), SystemError> {
        if !game.console.is_dirty() {
            return Ok(());
        }

        let camera = *game.world.resource_or_err::<Camera>()?;
        let visibility = game.world.resource_or_err::<VisibilityMap>()?;

        for (_, (pos, render)) in game.world.query::<(Position, Renderable)>() {
            if !visibility.is_visible(pos.x, pos.y) {
                continue;
            }
            if let Some((x, y)) = camera.to_screen(pos.x, pos.y) {
                game.console.set_char(x, y, render.to_glyph());
            }
        }

        game.console.set_dirty(false);
        Ok(())
    }
}
