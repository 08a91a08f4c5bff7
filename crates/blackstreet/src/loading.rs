//! Asset progress tracking and the loading overlay.
//!
//! Entering the gameplay route registers the scene models with an
//! [`AssetProgress`] tracker and mounts a fresh [`Overlay`]. Each frame the
//! tracker is refreshed from the asset server, its percentage is fed to the
//! overlay, and the overlay's timers are advanced against the engine clock.
//!
//! The overlay blocks the scene until it reports done. If loading stalls past
//! the configured timeout it switches to a failure prompt with a retry button,
//! which reloads whatever is still outstanding and mounts a new overlay.

use bevy::{
    asset::{RecursiveDependencyLoadState, UntypedAssetId},
    prelude::*,
};
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use blackstreet_core::{LoadStatus, LoadingOverlay, OverlayEvent, ProgressTracker};

use crate::{launch_params::LaunchParams, scene::SceneAssets, screen::AppRoute};

/// Background shown behind the overlay.
const BACKDROP_PATH: &str = "images/forza3.jpg";

/// Accent colour of the progress fill.
const FILL_COLOR: egui::Color32 = egui::Color32::from_rgb(0x00, 0xcc, 0x88);

/// Plugin for asset progress and the loading overlay.
pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<RetryLoading>()
            .add_systems(OnEnter(AppRoute::Gameplay), spawn_backdrop)
            .add_systems(OnExit(AppRoute::Gameplay), unmount_overlay)
            .add_systems(
                Update,
                (retry_loading, track_asset_progress, advance_overlay)
                    .chain()
                    .run_if(in_state(AppRoute::Gameplay))
                    .run_if(resource_exists::<Overlay>),
            )
            .add_systems(
                EguiPrimaryContextPass,
                overlay_ui
                    .run_if(in_state(AppRoute::Gameplay))
                    .run_if(overlay_is_visible),
            );
    }
}

/// Aggregated load progress of the gameplay screen's assets.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct AssetProgress(pub ProgressTracker<UntypedAssetId>);

/// The mounted loading overlay.
#[derive(Resource, Deref, DerefMut)]
pub struct Overlay(pub LoadingOverlay);

/// Request to reload outstanding assets after a timeout.
#[derive(Message, Debug, Clone, Copy)]
pub struct RetryLoading;

/// Marker for the overlay's background image.
#[derive(Component)]
struct LoadingBackdrop;

/// Run condition: the overlay has finished and the scene is interactive.
pub fn scene_is_ready(overlay: Option<Res<Overlay>>) -> bool {
    overlay.is_some_and(|overlay| overlay.is_ready())
}

/// Run condition: the overlay is mounted and still blocks the scene.
fn overlay_is_visible(overlay: Option<Res<Overlay>>) -> bool {
    overlay.is_some_and(|overlay| overlay.is_visible())
}

/// Mount a fresh overlay and tracker for the given assets.
pub fn mount_overlay(
    commands: &mut Commands,
    params: &LaunchParams,
    time: &Time,
    ids: impl IntoIterator<Item = UntypedAssetId>,
) {
    let mut progress = AssetProgress::default();
    for id in ids {
        progress.register(id);
    }
    tracing::info!("Loading {} scene asset(s)", progress.registered());

    commands.insert_resource(progress);
    commands.insert_resource(Overlay(LoadingOverlay::new(params.overlay, time.elapsed())));
}

fn spawn_backdrop(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn((
        LoadingBackdrop,
        ImageNode::new(asset_server.load(BACKDROP_PATH)),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        DespawnOnExit(AppRoute::Gameplay),
    ));
}

/// Tear down the overlay, cancelling any pending settle timer.
fn unmount_overlay(mut commands: Commands) {
    commands.remove_resource::<Overlay>();
    commands.remove_resource::<AssetProgress>();
}

/// Refresh per-asset status from the asset server.
fn track_asset_progress(
    asset_server: Res<AssetServer>,
    mut progress: ResMut<AssetProgress>,
) -> Result {
    let pending: Vec<UntypedAssetId> = progress.pending().copied().collect();
    for id in pending {
        match asset_server.get_recursive_dependency_load_state(id) {
            Some(RecursiveDependencyLoadState::Loaded) => {
                progress.mark_loaded(&id)?;
                tracing::info!("Asset {id:?} loaded ({:.0}%)", progress.progress());
                if progress.is_complete() {
                    tracing::info!("All {} scene asset(s) loaded", progress.registered());
                }
            }
            Some(RecursiveDependencyLoadState::Failed(e)) => {
                progress.mark_failed(&id)?;
                tracing::error!("Asset {id:?} failed to load: {e}");
            }
            _ => {}
        }
    }
    Ok(())
}

/// Feed progress to the overlay and advance its timers.
fn advance_overlay(
    mut commands: Commands,
    time: Res<Time>,
    progress: Res<AssetProgress>,
    mut overlay: ResMut<Overlay>,
    backdrop_query: Query<Entity, With<LoadingBackdrop>>,
) {
    let now = time.elapsed();

    let observed = overlay.observe(progress.progress(), now);
    let ticked = overlay.tick(now);

    for event in observed.into_iter().chain(ticked) {
        match event {
            OverlayEvent::Settling => {
                tracing::info!("Assets loaded, settling");
            }
            OverlayEvent::Finished => {
                tracing::info!("Scene ready");
                for entity in &backdrop_query {
                    commands.entity(entity).despawn();
                }
            }
            OverlayEvent::TimedOut => {
                tracing::warn!(
                    "Loading timed out at {}% ({} failed, {} pending)",
                    overlay.percent(),
                    progress.failed(),
                    progress.pending().count()
                );
            }
        }
    }
}

/// Restart loading after a timeout.
///
/// Assets the tracker has not seen load are reloaded from source and a fresh
/// overlay is mounted; assets that already loaded count as done straight away.
fn retry_loading(
    mut commands: Commands,
    mut retries: MessageReader<RetryLoading>,
    asset_server: Res<AssetServer>,
    params: Res<LaunchParams>,
    time: Res<Time>,
    progress: Res<AssetProgress>,
    scene_assets: Option<Res<SceneAssets>>,
) {
    if retries.read().count() == 0 {
        return;
    }
    let Some(scene_assets) = scene_assets else {
        return;
    };

    for id in scene_assets.ids() {
        if progress.status(&id) == Some(LoadStatus::Loaded) {
            continue;
        }
        if let Some(path) = asset_server.get_path(id) {
            tracing::info!("Retrying {path}");
            asset_server.reload(path.without_label().into_owned());
        }
    }
    mount_overlay(&mut commands, &params, &time, scene_assets.ids());
}

/// Render the blocking overlay.
fn overlay_ui(
    mut contexts: EguiContexts,
    overlay: Res<Overlay>,
    mut retries: MessageWriter<RetryLoading>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    let mut retry = false;
    egui::TopBottomPanel::bottom("loading_overlay")
        .frame(egui::Frame::NONE.inner_margin(egui::Margin::symmetric(30, 80)))
        .show_separator_line(false)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.set_max_width(800.0);
                if overlay.is_failed() {
                    ui.heading(egui::RichText::new("Loading failed").color(egui::Color32::WHITE));
                    ui.label(
                        egui::RichText::new(format!("Stopped at {}%", overlay.percent()))
                            .color(egui::Color32::WHITE),
                    );
                    retry = ui.button("Retry").clicked();
                } else {
                    ui.heading(egui::RichText::new("Loading...").color(egui::Color32::WHITE));
                    ui.add(
                        egui::ProgressBar::new(overlay.fill())
                            .fill(FILL_COLOR)
                            .desired_height(15.0)
                            .corner_radius(7),
                    );
                    ui.label(
                        egui::RichText::new(format!("{}%", overlay.percent()))
                            .color(egui::Color32::WHITE),
                    );
                }
            });
        });

    if retry {
        retries.write(RetryLoading);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::{state::app::StatesPlugin, time::TimeUpdateStrategy};
    use blackstreet_core::{OverlayConfig, OverlayPhase};

    use super::*;
    use crate::scene::ScenePlugin;

    /// Build an app whose clock advances 100 ms per update, with one tracked
    /// id standing in for a scene asset.
    fn overlay_app(config: OverlayConfig) -> (App, UntypedAssetId) {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .init_state::<AppRoute>()
            .add_systems(OnExit(AppRoute::Gameplay), unmount_overlay)
            .add_systems(
                Update,
                advance_overlay
                    .run_if(in_state(AppRoute::Gameplay))
                    .run_if(resource_exists::<Overlay>),
            );

        let id = UntypedAssetId::from(AssetId::<Image>::default());
        let params = LaunchParams {
            overlay: config,
            ..LaunchParams::default()
        };
        app.world_mut()
            .resource_mut::<NextState<AppRoute>>()
            .set(AppRoute::Gameplay);
        app.update();

        let mut progress = AssetProgress::default();
        progress.register(id);
        let now = app.world().resource::<Time>().elapsed();
        app.insert_resource(progress);
        app.insert_resource(Overlay(LoadingOverlay::new(params.overlay, now)));
        (app, id)
    }

    fn phase(app: &App) -> OverlayPhase {
        app.world().resource::<Overlay>().phase()
    }

    #[test]
    fn test_overlay_finishes_after_settle_delay() {
        let (mut app, id) = overlay_app(OverlayConfig {
            settle_delay: Duration::from_millis(500),
            load_timeout: None,
        });

        for _ in 0..3 {
            app.update();
            assert_eq!(phase(&app), OverlayPhase::Loading);
        }

        app.world_mut()
            .resource_mut::<AssetProgress>()
            .mark_loaded(&id)
            .unwrap();
        app.update();
        assert!(matches!(phase(&app), OverlayPhase::Settling { .. }));

        // Four more 100 ms frames are still inside the delay.
        for _ in 0..4 {
            app.update();
            assert!(matches!(phase(&app), OverlayPhase::Settling { .. }));
        }
        app.update();
        assert_eq!(phase(&app), OverlayPhase::Done);
    }

    #[test]
    fn test_backdrop_removed_when_ready() {
        let (mut app, id) = overlay_app(OverlayConfig {
            settle_delay: Duration::ZERO,
            load_timeout: None,
        });
        let backdrop = app.world_mut().spawn(LoadingBackdrop).id();

        app.world_mut()
            .resource_mut::<AssetProgress>()
            .mark_loaded(&id)
            .unwrap();
        app.update();

        assert_eq!(phase(&app), OverlayPhase::Done);
        assert!(app.world().get_entity(backdrop).is_err());
    }

    #[test]
    fn test_stalled_load_times_out() {
        let (mut app, id) = overlay_app(OverlayConfig {
            settle_delay: Duration::from_millis(500),
            load_timeout: Some(Duration::from_secs(1)),
        });
        app.world_mut()
            .resource_mut::<AssetProgress>()
            .mark_failed(&id)
            .unwrap();

        for _ in 0..12 {
            app.update();
        }
        let overlay = app.world().resource::<Overlay>();
        assert!(overlay.is_failed());
        assert!(overlay.is_visible());
        assert!(!overlay.is_ready());
    }

    #[test]
    fn test_leaving_unmounts_overlay() {
        let (mut app, _) = overlay_app(OverlayConfig::default());
        app.world_mut()
            .resource_mut::<NextState<AppRoute>>()
            .set(AppRoute::Landing);
        app.update();

        assert!(app.world().get_resource::<Overlay>().is_none());
        assert!(app.world().get_resource::<AssetProgress>().is_none());
    }

    /// Build an app that enters the gameplay route with the real scene and
    /// loading plugins. No model loaders are registered, so both scene loads
    /// fail.
    fn scene_app(config: OverlayConfig) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, AssetPlugin::default()))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .insert_resource(LaunchParams {
                overlay: config,
                ..LaunchParams::default()
            })
            .init_asset::<Image>()
            .init_asset::<Scene>()
            .init_state::<AppRoute>()
            .add_plugins((ScenePlugin, LoadingPlugin));
        app.world_mut()
            .resource_mut::<NextState<AppRoute>>()
            .set(AppRoute::Gameplay);
        app.update();
        app
    }

    /// Update until `done` holds, giving the asset tasks time to resolve.
    fn update_until(app: &mut App, done: impl Fn(&App) -> bool) {
        for _ in 0..500 {
            if done(app) {
                return;
            }
            std::thread::sleep(Duration::from_millis(2));
            app.update();
        }
        panic!("condition not reached");
    }

    #[test]
    fn test_failed_assets_stall_progress() {
        let mut app = scene_app(OverlayConfig {
            settle_delay: Duration::ZERO,
            load_timeout: None,
        });
        assert_eq!(app.world().resource::<AssetProgress>().registered(), 2);

        update_until(&mut app, |app| {
            app.world().resource::<AssetProgress>().failed() == 2
        });

        let progress = app.world().resource::<AssetProgress>();
        assert_eq!(progress.progress(), 0.0);
        assert_eq!(progress.pending().count(), 0);
        assert_eq!(phase(&app), OverlayPhase::Loading);
    }

    #[test]
    fn test_retry_mounts_fresh_overlay() {
        let mut app = scene_app(OverlayConfig {
            settle_delay: Duration::ZERO,
            load_timeout: Some(Duration::from_secs(1)),
        });
        update_until(&mut app, |app| app.world().resource::<Overlay>().is_failed());

        app.world_mut().write_message(RetryLoading);
        app.update();

        assert_eq!(phase(&app), OverlayPhase::Loading);
        assert_eq!(app.world().resource::<AssetProgress>().registered(), 2);

        // The new overlay measures its timeout from the retry, not from entry.
        for _ in 0..5 {
            app.update();
            assert_eq!(phase(&app), OverlayPhase::Loading);
        }
    }
}
