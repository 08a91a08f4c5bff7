//! Black Street X: a start menu and a drivable city scene using Bevy.
//!
//! The landing route shows a start modal and a menu card over a background
//! image with music. Career Mode opens the city scene, which blocks behind a
//! loading overlay until its models arrive and then lets the player nudge the
//! car around with the arrow keys or the on-screen pad.

mod camera;
mod drive;
mod input;
mod landing;
mod launch_params;
mod loading;
mod scene;
mod screen;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use camera::CameraPlugin;
use drive::DrivePlugin;
use input::InputPlugin;
use landing::LandingPlugin;
use loading::LoadingPlugin;
use scene::ScenePlugin;
use screen::ScreenPlugin;

/// Plugin for the main application.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default()).add_plugins((
            ScreenPlugin,
            InputPlugin,
            CameraPlugin,
            LandingPlugin,
            ScenePlugin,
            LoadingPlugin,
            DrivePlugin,
        ));
    }
}

fn main() {
    // Initialize tracing for native platforms.
    #[cfg(not(target_family = "wasm"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Initialize tracing for WASM (logs to browser console).
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let params = launch_params::parse();
    tracing::info!("Launch parameters: {params:?}");

    let mut app = App::new();

    #[allow(unused_mut)]
    let mut window = Window {
        title: "Black Street X".to_string(),
        resolution: (1920, 1080).into(),
        position: WindowPosition::Centered(MonitorSelection::Primary),
        ..Default::default()
    };

    // WASM: Fit canvas to parent element and prevent browser event handling.
    #[cfg(target_family = "wasm")]
    {
        window.fit_canvas_to_parent = true;
        window.prevent_default_event_handling = true;
    }

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(window),
        ..Default::default()
    }));

    app.insert_resource(params).add_plugins(AppPlugin).run();
}
