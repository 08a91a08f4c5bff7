//! Route states.
//!
//! Two top-level routes mirror [`blackstreet_core::Route`]. The landing route
//! carries a sub-state for the start modal and the menu card; because it is a
//! sub-state it resets to the start modal every time the landing route is
//! re-entered, the same way a freshly mounted landing page would.

use bevy::prelude::*;
use blackstreet_core::{LandingView, Route};
use leafwing_input_manager::prelude::*;

use crate::{input::SceneAction, launch_params::LaunchParams};

/// Top-level route.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    #[default]
    Landing,
    Gameplay,
}

impl From<Route> for AppRoute {
    fn from(route: Route) -> Self {
        match route {
            Route::Landing => AppRoute::Landing,
            Route::Gameplay => AppRoute::Gameplay,
        }
    }
}

/// View within the landing route.
#[derive(SubStates, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[source(AppRoute = AppRoute::Landing)]
pub enum LandingScreen {
    #[default]
    StartModal,
    MainMenu,
}

impl From<LandingView> for LandingScreen {
    fn from(view: LandingView) -> Self {
        match view {
            LandingView::StartModal => LandingScreen::StartModal,
            LandingView::MainMenu => LandingScreen::MainMenu,
        }
    }
}

/// Plugin registering route states.
pub struct ScreenPlugin;

impl Plugin for ScreenPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppRoute>()
            .add_sub_state::<LandingScreen>()
            .add_systems(Startup, apply_launch_route)
            .add_systems(
                Update,
                leave_gameplay.run_if(in_state(AppRoute::Gameplay)),
            )
            .add_systems(OnEnter(AppRoute::Landing), log_route(AppRoute::Landing))
            .add_systems(OnEnter(AppRoute::Gameplay), log_route(AppRoute::Gameplay));
    }
}

fn log_route(route: AppRoute) -> impl Fn() {
    move || tracing::info!("Entered route {route:?}")
}

/// Honour `--skip-intro`.
fn apply_launch_route(params: Res<LaunchParams>, mut next_route: ResMut<NextState<AppRoute>>) {
    if params.skip_intro {
        next_route.set(AppRoute::Gameplay);
    }
}

/// Return to the landing route with Escape.
fn leave_gameplay(
    action_query: Query<&ActionState<SceneAction>>,
    mut next_route: ResMut<NextState<AppRoute>>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    if action_state.just_pressed(&SceneAction::Leave) {
        next_route.set(AppRoute::Landing);
    }
}
