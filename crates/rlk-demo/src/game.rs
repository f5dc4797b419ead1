//! The demo's scheduler context.

use rlk_ecs::{Entity, World};
use rlk_event::EventWorldExt;
use rlk_spatial::VisibilityMap;
use rlk_tick::Scheduler;

use crate::{
    camera::Camera,
    components::{Player, Position},
    config::DemoConfig,
    console::Console,
    error::DemoError,
    input::InputSource,
    map::TileMap,
    systems::{ActorRenderSystem, CameraSystem, PlayerSystem, VisibilitySystem},
};

/// Everything a frame touches: the world plus the host's console and input.
///
/// Map, visibility, and camera state live in the world as resources.
#[derive(Debug)]
pub struct Game<C, I> {
    pub world: World,
    pub console: C,
    pub input: I,
}

impl<C: Console, I: InputSource> Game<C, I> {
    /// Set up a world around `map`. The player is spawned when the systems
    /// are configured.
    pub fn new(map: TileMap, console: C, input: I) -> Self {
        let mut world = World::new();
        world.insert_resource(VisibilityMap::new(map.width(), map.height()));
        world.insert_resource(map);
        world.insert_resource(Camera::default());
        world.init_events();

        Self {
            world,
            console,
            input,
        }
    }
}

impl<C, I> Game<C, I> {
    /// The player entity and where it stands.
    #[must_use]
    pub fn player(&self) -> Option<(Entity, Position)> {
        player_position(&self.world).ok()
    }
}

pub(crate) fn player_position(world: &World) -> Result<(Entity, Position), DemoError> {
    world
        .query::<(Player, Position)>()
        .next()
        .map(|(entity, (_, pos))| (entity, *pos))
        .ok_or(DemoError::NoPlayer)
}

/// The demo's systems, in run order.
#[must_use]
pub fn scheduler<C: Console, I: InputSource>(config: &DemoConfig) -> Scheduler<Game<C, I>> {
    Scheduler::new()
        .with_system(PlayerSystem::new(config.repeat_delay_ms))
        .with_system(VisibilitySystem::new())
        .with_system(CameraSystem::new(config.fov_radius))
        .with_system(ActorRenderSystem)
}
