mod shared;
mod world;
mod flora;
mod mining;
mod travelers;
mod economy;
mod player;
mod data;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Fernvale".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<PlayerState>()
        .init_resource::<Inventory>()
        .init_resource::<ItemRegistry>()
        .init_resource::<SpawnTuning>()
        .init_resource::<FloraIndex>()
        .init_resource::<OreIndex>()
        .init_resource::<CropState>()
        .init_resource::<TreeState>()
        .init_resource::<EnemyIndex>()
        .init_resource::<RoadsideStand>()
        // Events
        .add_event::<TileActionEvent>()
        .add_event::<TileChangedEvent>()
        .add_event::<ItemPickupEvent>()
        .add_event::<GoldChangeEvent>()
        .add_event::<TravelerArrivedEvent>()
        .add_event::<StandSaleEvent>()
        // Domain plugins
        .add_plugins(world::WorldPlugin)
        .add_plugins(flora::FloraPlugin)
        .add_plugins(mining::MiningPlugin)
        .add_plugins(travelers::TravelersPlugin)
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(player::PlayerPlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_scale(Vec3::splat(1.0 / PIXEL_SCALE)),
    ));
}
