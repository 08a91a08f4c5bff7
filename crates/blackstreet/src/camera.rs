//! Free-orbit camera.
//!
//! A single camera lives for the whole session (it also hosts the UI). On the
//! gameplay route it orbits a focus point once the loading overlay is gone:
//! left drag rotates, right drag pans, scroll zooms. It never follows the car.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use bevy_egui::input::egui_wants_any_pointer_input;
use leafwing_input_manager::prelude::*;

use crate::{
    input::{SceneAction, default_scene_input_map},
    loading::scene_is_ready,
    screen::AppRoute,
};

/// Where the camera starts, relative to the world origin.
const START_EYE: Vec3 = Vec3::new(0.0, 10.0, 20.0);
/// Vertical field of view in degrees.
const FOV_DEGREES: f32 = 60.0;

/// Closest the camera may get to its focus.
const MIN_RADIUS: f32 = 1.0;
/// Farthest the camera may get from its focus.
const MAX_RADIUS: f32 = 500.0;
/// Keeps the camera off the poles so `looking_at` stays well-defined.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Plugin for the orbit camera.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitSettings>()
            .add_systems(Startup, spawn_camera)
            .add_systems(OnEnter(AppRoute::Gameplay), reset_orbit)
            .add_systems(
                Update,
                (
                    orbit_camera
                        .run_if(scene_is_ready)
                        .run_if(not(egui_wants_any_pointer_input)),
                    apply_orbit,
                )
                    .chain()
                    .run_if(in_state(AppRoute::Gameplay)),
            );
    }
}

/// Mouse sensitivities for the orbit camera.
#[derive(Resource)]
pub struct OrbitSettings {
    /// Radians per pixel of drag.
    pub rotate_sensitivity: f32,
    /// Fraction of the radius panned per pixel of drag.
    pub pan_sensitivity: f32,
    /// Zoom factor per scroll step.
    pub zoom_factor: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 0.005,
            pan_sensitivity: 0.001,
            zoom_factor: 1.1,
        }
    }
}

/// Spherical orbit state around a focus point.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    /// Rotation around +Y, zero looking down -Z.
    pub yaw: f32,
    /// Elevation above the focus plane.
    pub pitch: f32,
}

impl OrbitCamera {
    /// Orbit state placing the camera at `eye` looking at `focus`.
    pub fn from_eye(eye: Vec3, focus: Vec3) -> Self {
        let offset = eye - focus;
        let radius = offset.length().max(MIN_RADIUS);
        Self {
            focus,
            radius,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / radius).clamp(-1.0, 1.0).asin(),
        }
    }

    /// Camera position.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.focus + self.radius * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    /// Transform looking from the eye at the focus.
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.focus, Vec3::Y)
    }

    /// Rotate by a mouse delta in radians.
    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw -= delta.x;
        self.pitch = (self.pitch + delta.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Move the focus in the camera's view plane.
    pub fn pan(&mut self, delta: Vec2) {
        let rotation = self.transform().rotation;
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        self.focus += (-right * delta.x + up * delta.y) * self.radius;
    }

    /// Scale the radius, clamped to the allowed range.
    pub fn zoom(&mut self, factor: f32) {
        self.radius = (self.radius * factor).clamp(MIN_RADIUS, MAX_RADIUS);
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_eye(START_EYE, Vec3::ZERO)
    }
}

/// Spawn the session camera.
fn spawn_camera(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: FOV_DEGREES.to_radians(),
            ..Default::default()
        }),
        orbit.transform(),
        orbit,
        AmbientLight {
            color: Color::WHITE,
            brightness: 500.0,
            affects_lightmapped_meshes: true,
        },
        default_scene_input_map(),
        ActionState::<SceneAction>::default(),
    ));
}

/// Put the camera back at its starting pose for a fresh gameplay screen.
fn reset_orbit(mut query: Query<&mut OrbitCamera>) {
    for mut orbit in &mut query {
        *orbit = OrbitCamera::default();
    }
}

/// Apply mouse input to the orbit state.
fn orbit_camera(
    action_query: Query<&ActionState<SceneAction>>,
    settings: Res<OrbitSettings>,
    mut query: Query<&mut OrbitCamera>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    let look = action_state.axis_pair(&SceneAction::Look);
    let scroll = action_state.value(&SceneAction::Zoom);

    for mut orbit in &mut query {
        if look != Vec2::ZERO {
            if action_state.pressed(&SceneAction::Rotate) {
                orbit.rotate(look * settings.rotate_sensitivity);
            } else if action_state.pressed(&SceneAction::Pan) {
                orbit.pan(look * settings.pan_sensitivity);
            }
        }
        if scroll != 0.0 {
            // Scrolling up moves closer.
            orbit.zoom(settings.zoom_factor.powf(-scroll));
        }
    }
}

/// Write the orbit state into the camera transform.
fn apply_orbit(mut query: Query<(&OrbitCamera, &mut Transform), Changed<OrbitCamera>>) {
    for (orbit, mut transform) in &mut query {
        *transform = orbit.transform();
    }
}
