//! Landing route: start modal, main menu card and background music.
//!
//! The music track is fetched at startup so it is ready by the time the player
//! dismisses the start modal. Playback is attempted on that transition; any
//! refusal is logged and the menu appears regardless. The music entity belongs
//! to the landing route and stops when the route is left.

use bevy::{asset::LoadState, prelude::*};
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use blackstreet_core::{
    Error, MenuEntry, MusicPlayer,
    menu::{START_BUTTON, START_PROMPT, TITLE, dismiss_start_modal},
};

use crate::{
    launch_params::LaunchParams,
    screen::{AppRoute, LandingScreen},
};

/// Looping background track.
const MUSIC_PATH: &str = "audio/styles_of_beyond.mp3";
/// Full-screen landing background.
const BACKGROUND_PATH: &str = "images/front_page_car.jpg";

const START_COLOR: egui::Color32 = egui::Color32::from_rgb(0x00, 0xcc, 0x88);
const MENU_BUTTON_COLOR: egui::Color32 = egui::Color32::from_rgb(0x00, 0x99, 0xff);

/// Plugin for the landing route.
pub struct LandingPlugin;

impl Plugin for LandingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_music)
            .add_systems(OnEnter(AppRoute::Landing), spawn_background)
            .add_systems(
                EguiPrimaryContextPass,
                (
                    start_modal_ui.run_if(in_state(LandingScreen::StartModal)),
                    main_menu_ui.run_if(in_state(LandingScreen::MainMenu)),
                ),
            );
    }
}

/// Handle to the background track.
#[derive(Resource)]
pub struct MusicTrack(pub Handle<AudioSource>);

/// Marker for the playing background music entity.
#[derive(Component)]
pub struct BackgroundMusic;

fn load_music(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(MusicTrack(asset_server.load(MUSIC_PATH)));
}

fn spawn_background(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn((
        ImageNode::new(asset_server.load(BACKGROUND_PATH)),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        DespawnOnExit(AppRoute::Landing),
    ));
}

/// Starts the background track by spawning a looping audio player.
pub struct LandingMusic<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
    pub asset_server: &'a AssetServer,
    pub track: Option<&'a MusicTrack>,
    pub muted: bool,
    pub already_playing: bool,
}

impl MusicPlayer for LandingMusic<'_, '_, '_> {
    fn play(&mut self) -> blackstreet_core::Result<()> {
        if self.already_playing {
            return Ok(());
        }
        if self.muted {
            return Err(Error::AudioUnavailable {
                reason: "muted by launch parameters".to_string(),
            });
        }
        let Some(track) = self.track else {
            return Err(Error::AudioUnavailable {
                reason: "track was never requested".to_string(),
            });
        };
        if let Some(LoadState::Failed(e)) = self.asset_server.get_load_state(&track.0) {
            return Err(Error::AudioUnavailable {
                reason: e.to_string(),
            });
        }

        self.commands.spawn((
            BackgroundMusic,
            AudioPlayer::new(track.0.clone()),
            PlaybackSettings::LOOP,
            DespawnOnExit(AppRoute::Landing),
        ));
        tracing::info!("Background music started");
        Ok(())
    }
}

/// Render the start modal.
fn start_modal_ui(
    mut contexts: EguiContexts,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    params: Res<LaunchParams>,
    track: Option<Res<MusicTrack>>,
    music_query: Query<(), With<BackgroundMusic>>,
    mut next_view: ResMut<NextState<LandingScreen>>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    let mut start = false;
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE.fill(egui::Color32::from_black_alpha(230)))
        .show(ctx, |ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.vertical_centered(|ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_white_alpha(25))
                    .corner_radius(16)
                    .inner_margin(egui::Margin::same(60))
                    .show(ui, |ui| {
                        ui.heading(
                            egui::RichText::new(START_PROMPT)
                                .size(32.0)
                                .color(egui::Color32::WHITE),
                        );
                        ui.add_space(20.0);
                        start = ui
                            .add(
                                egui::Button::new(
                                    egui::RichText::new(START_BUTTON)
                                        .size(19.0)
                                        .color(egui::Color32::WHITE),
                                )
                                .fill(START_COLOR)
                                .corner_radius(30),
                            )
                            .clicked();
                    });
            });
        });

    if start {
        let mut music = LandingMusic {
            commands: &mut commands,
            asset_server: &asset_server,
            track: track.as_deref(),
            muted: params.mute,
            already_playing: !music_query.is_empty(),
        };
        next_view.set(dismiss_start_modal(&mut music).into());
    }

    Ok(())
}

/// Render the main menu card.
fn main_menu_ui(
    mut contexts: EguiContexts,
    mut next_route: ResMut<NextState<AppRoute>>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    let mut chosen = None;
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            ui.add_space(ui.available_height() / 4.0);
            ui.vertical_centered(|ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_black_alpha(153))
                    .corner_radius(20)
                    .inner_margin(egui::Margin::same(50))
                    .show(ui, |ui| {
                        ui.heading(
                            egui::RichText::new(TITLE)
                                .size(48.0)
                                .color(egui::Color32::WHITE),
                        );
                        ui.add_space(40.0);
                        ui.spacing_mut().item_spacing.y = 20.0;
                        for entry in MenuEntry::ALL {
                            let button = egui::Button::new(
                                egui::RichText::new(entry.label())
                                    .size(18.0)
                                    .color(egui::Color32::WHITE),
                            )
                            .fill(MENU_BUTTON_COLOR)
                            .corner_radius(30)
                            .min_size(egui::vec2(400.0, 48.0));
                            if ui.add(button).clicked() {
                                chosen = Some(entry);
                            }
                        }
                    });
            });
        });

    if let Some(entry) = chosen {
        if entry.is_placeholder() {
            tracing::debug!("{} is not available yet", entry.label());
        } else {
            next_route.set(entry.destination().into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use bevy::{ecs::system::RunSystemOnce, state::app::StatesPlugin};

    use super::*;

    fn landing_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, AssetPlugin::default()))
            .init_asset::<AudioSource>()
            .init_state::<AppRoute>()
            .add_sub_state::<LandingScreen>();
        app.update();
        app
    }

    /// Dismiss the modal through the same path the Start button uses.
    fn dismiss(app: &mut App, muted: bool, with_track: bool) {
        app.world_mut()
            .run_system_once(
                move |mut commands: Commands,
                      asset_server: Res<AssetServer>,
                      music_query: Query<(), With<BackgroundMusic>>,
                      mut next_view: ResMut<NextState<LandingScreen>>| {
                    let track = with_track.then(|| MusicTrack(Handle::default()));
                    let mut music = LandingMusic {
                        commands: &mut commands,
                        asset_server: &asset_server,
                        track: track.as_ref(),
                        muted,
                        already_playing: !music_query.is_empty(),
                    };
                    next_view.set(dismiss_start_modal(&mut music).into());
                },
            )
            .unwrap();
        app.update();
    }

    fn music_count(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<(), With<BackgroundMusic>>()
            .iter(app.world())
            .count()
    }

    fn view(app: &App) -> LandingScreen {
        *app.world().resource::<State<LandingScreen>>().get()
    }

    #[test]
    fn test_start_plays_music_and_shows_menu() {
        let mut app = landing_app();
        dismiss(&mut app, false, true);

        assert_eq!(view(&app), LandingScreen::MainMenu);
        assert_eq!(music_count(&mut app), 1);
    }

    #[test]
    fn test_refused_audio_still_dismisses() {
        let mut app = landing_app();
        dismiss(&mut app, true, true);

        assert_eq!(view(&app), LandingScreen::MainMenu);
        assert_eq!(music_count(&mut app), 0);
    }

    #[test]
    fn test_missing_track_still_dismisses() {
        let mut app = landing_app();
        dismiss(&mut app, false, false);

        assert_eq!(view(&app), LandingScreen::MainMenu);
        assert_eq!(music_count(&mut app), 0);
    }

    #[test]
    fn test_music_stops_when_leaving_landing() {
        let mut app = landing_app();
        dismiss(&mut app, false, true);
        assert_eq!(music_count(&mut app), 1);

        app.world_mut()
            .resource_mut::<NextState<AppRoute>>()
            .set(AppRoute::Gameplay);
        app.update();

        assert_eq!(music_count(&mut app), 0);
    }
}
