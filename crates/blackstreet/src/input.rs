//! Centralized input action definitions.
//!
//! Camera and navigation actions go through `leafwing-input-manager`. Drive
//! keys are read from raw keyboard messages instead, because every key-down
//! (including OS key repeats) must produce exactly one unit step and action
//! states only report the initial press.

use bevy::{
    input::{ButtonState, keyboard::KeyboardInput},
    prelude::*,
};
use bevy_egui::input::EguiWantsInput;
use blackstreet_core::DriveIntent;
use leafwing_input_manager::prelude::*;

use crate::{drive::DriveCommand, loading::Overlay, screen::AppRoute};

// ============================================================================
// Action enums
// ============================================================================

/// Actions for the orbit camera and route navigation.
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum SceneAction {
    /// Mouse motion, applied as rotation or pan depending on held buttons.
    #[actionlike(DualAxis)]
    Look,
    /// Hold to rotate around the focus point (left mouse).
    Rotate,
    /// Hold to pan the focus point (right mouse).
    Pan,
    /// Zoom toward or away from the focus point (scroll wheel).
    #[actionlike(Axis)]
    Zoom,
    /// Return to the landing route (ESC).
    Leave,
}

/// Create the default input map for scene actions.
pub fn default_scene_input_map() -> InputMap<SceneAction> {
    InputMap::default()
        .with_dual_axis(SceneAction::Look, MouseMove::default())
        .with(SceneAction::Rotate, MouseButton::Left)
        .with(SceneAction::Pan, MouseButton::Right)
        .with_axis(SceneAction::Zoom, MouseScrollAxis::Y)
        .with(SceneAction::Leave, KeyCode::Escape)
}

// ============================================================================
// Drive keys
// ============================================================================

/// Keys that drive the car.
const DRIVE_KEYS: &[(KeyCode, DriveIntent)] = &[
    (KeyCode::ArrowUp, DriveIntent::Forward),
    (KeyCode::ArrowDown, DriveIntent::Backward),
    (KeyCode::ArrowLeft, DriveIntent::Left),
    (KeyCode::ArrowRight, DriveIntent::Right),
];

/// Map a physical key to a drive intent. Other keys do nothing.
pub fn drive_intent_for_key(key: KeyCode) -> Option<DriveIntent> {
    DRIVE_KEYS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, intent)| *intent)
}

// ============================================================================
// Plugin
// ============================================================================

/// Plugin that registers input action types and the keyboard drive source.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<SceneAction>::default())
            .add_systems(
                Update,
                keyboard_drive_input
                    .run_if(in_state(AppRoute::Gameplay))
                    .before(crate::drive::apply_drive_commands),
            );
    }
}

/// Turn arrow-key presses (including repeats) into drive commands.
///
/// Presses made while the scene is still loading, or while egui has keyboard
/// focus, are consumed and dropped so they never replay later.
pub(crate) fn keyboard_drive_input(
    mut keyboard: MessageReader<KeyboardInput>,
    mut commands: MessageWriter<DriveCommand>,
    overlay: Option<Res<Overlay>>,
    egui_input: Option<Res<EguiWantsInput>>,
) {
    let scene_ready = overlay.is_some_and(|overlay| overlay.is_ready());
    let egui_focused = egui_input.is_some_and(|input| input.wants_any_keyboard_input());
    if !scene_ready || egui_focused {
        keyboard.clear();
        return;
    }

    for event in keyboard.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        if let Some(intent) = drive_intent_for_key(event.key_code) {
            commands.write(DriveCommand(intent));
        }
    }
}
