//! Car position store and the systems that step it.
//!
//! Keyboard and on-screen buttons both emit [`DriveCommand`] messages. A single
//! system folds them, in arrival order, into the [`CarPositionStore`] using the
//! core reducer, and the car's transform is synced from the store every frame.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use blackstreet_core::{CarPosition, DriveIntent};

use crate::{loading::scene_is_ready, scene::Car, screen::AppRoute};

/// Plugin for car positioning.
pub struct DrivePlugin;

impl Plugin for DrivePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<DriveCommand>()
            .add_systems(OnEnter(AppRoute::Gameplay), reset_position_store)
            .add_systems(OnExit(AppRoute::Gameplay), remove_position_store)
            .add_systems(
                Update,
                (apply_drive_commands, sync_car_transform)
                    .chain()
                    .run_if(in_state(AppRoute::Gameplay)),
            )
            .add_systems(
                EguiPrimaryContextPass,
                drive_buttons
                    .run_if(in_state(AppRoute::Gameplay))
                    .run_if(scene_is_ready),
            );
    }
}

/// One discrete input event.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveCommand(pub DriveIntent);

/// The committed car position for the current gameplay screen.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CarPositionStore(pub CarPosition);

fn reset_position_store(mut commands: Commands) {
    commands.insert_resource(CarPositionStore::default());
}

fn remove_position_store(mut commands: Commands) {
    commands.remove_resource::<CarPositionStore>();
}

/// Apply pending drive commands, each against the latest committed position.
pub(crate) fn apply_drive_commands(
    mut drive_commands: MessageReader<DriveCommand>,
    store: Option<ResMut<CarPositionStore>>,
) {
    let Some(mut store) = store else {
        drive_commands.clear();
        return;
    };

    for DriveCommand(intent) in drive_commands.read() {
        store.0 = store.0.step(*intent);
        tracing::debug!("Car moved {intent:?} to {:?}", store.0);
    }
}

/// Copy the committed position into the car's transform.
fn sync_car_transform(
    store: Option<Res<CarPositionStore>>,
    mut car_query: Query<&mut Transform, With<Car>>,
) {
    let Some(store) = store else {
        return;
    };

    let translation = store.0.translation();
    for mut transform in &mut car_query {
        transform.translation = translation;
    }
}

/// Render the on-screen direction pad.
fn drive_buttons(
    mut contexts: EguiContexts,
    mut drive_commands: MessageWriter<DriveCommand>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    let button = |ui: &mut egui::Ui, intent: DriveIntent| {
        ui.add_sized(
            [48.0, 36.0],
            egui::Button::new(egui::RichText::new(intent.button_label()).size(20.0)),
        )
        .clicked()
        .then_some(intent)
    };

    egui::Area::new(egui::Id::new("drive_buttons"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -20.0])
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing = egui::vec2(10.0, 10.0);
            let mut pressed = Vec::new();
            ui.vertical_centered(|ui| {
                pressed.extend(button(ui, DriveIntent::Forward));
                ui.horizontal(|ui| {
                    pressed.extend(button(ui, DriveIntent::Left));
                    pressed.extend(button(ui, DriveIntent::Right));
                });
                pressed.extend(button(ui, DriveIntent::Backward));
            });
            for intent in pressed {
                drive_commands.write(DriveCommand(intent));
            }
        });

    Ok(())
}
