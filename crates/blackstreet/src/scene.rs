//! City and car scene for the gameplay route.
//!
//! Everything spawned here is scoped to the gameplay route and despawned when
//! it exits. The 3D setup only ever runs from `OnEnter(AppRoute::Gameplay)`.

use bevy::{asset::UntypedAssetId, gltf::GltfAssetLabel, prelude::*};

use crate::{launch_params::LaunchParams, loading::mount_overlay, screen::AppRoute};

/// City/road model.
const CITY_MODEL_PATH: &str = "models/road.glb";
/// Car model.
const CAR_MODEL_PATH: &str = "models/car_scene.glb";

/// Plugin for the gameplay scene.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppRoute::Gameplay), setup_scene)
            .add_systems(OnExit(AppRoute::Gameplay), release_scene_assets);
    }
}

/// Marker for the car's root entity.
#[derive(Component)]
pub struct Car;

/// Marker for the city's root entity.
#[derive(Component)]
pub struct City;

/// Handles to the loaded model roots, held for the lifetime of the route.
#[derive(Resource, Debug, Clone)]
pub struct SceneAssets {
    pub city: Handle<Scene>,
    pub car: Handle<Scene>,
}

impl SceneAssets {
    /// Ids tracked by the loading overlay.
    pub fn ids(&self) -> [UntypedAssetId; 2] {
        [self.city.id().untyped(), self.car.id().untyped()]
    }
}

/// Load the models, spawn the scene and mount the loading overlay.
fn setup_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    params: Res<LaunchParams>,
    time: Res<Time>,
) {
    let assets = SceneAssets {
        city: asset_server.load(GltfAssetLabel::Scene(0).from_asset(CITY_MODEL_PATH)),
        car: asset_server.load(GltfAssetLabel::Scene(0).from_asset(CAR_MODEL_PATH)),
    };

    commands.spawn((
        City,
        SceneRoot(assets.city.clone()),
        Transform::default(),
        DespawnOnExit(AppRoute::Gameplay),
    ));

    // The car's translation is overwritten every frame from the position store.
    commands.spawn((
        Car,
        SceneRoot(assets.car.clone()),
        Transform::default(),
        DespawnOnExit(AppRoute::Gameplay),
    ));

    commands.spawn((
        DirectionalLight {
            color: Color::WHITE,
            illuminance: 10_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(10.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
        DespawnOnExit(AppRoute::Gameplay),
    ));

    mount_overlay(&mut commands, &params, &time, assets.ids());
    commands.insert_resource(assets);

    tracing::info!("Scene setup complete - arrow keys or on-screen buttons to drive");
}

/// Drop the scene handles so the models can be unloaded.
fn release_scene_assets(mut commands: Commands) {
    commands.remove_resource::<SceneAssets>();
}
