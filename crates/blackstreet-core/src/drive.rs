//! Discrete car positioning.
//!
//! The car lives on an integer grid. Each input event maps to a
//! [`DriveIntent`], and [`CarPosition::step`] is the reducer that produces the
//! next position from the current one. There is no velocity and no
//! debouncing: one event, one unit step along one axis.

use glam::{I64Vec3, Vec3};

/// One of the four directional inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveIntent {
    /// Toward -Z.
    Forward,
    /// Toward +Z.
    Backward,
    /// Toward -X.
    Left,
    /// Toward +X.
    Right,
}

impl DriveIntent {
    /// Unit step applied by this intent.
    pub fn delta(self) -> I64Vec3 {
        match self {
            DriveIntent::Forward => I64Vec3::NEG_Z,
            DriveIntent::Backward => I64Vec3::Z,
            DriveIntent::Left => I64Vec3::NEG_X,
            DriveIntent::Right => I64Vec3::X,
        }
    }

    /// Label of the matching on-screen button.
    pub fn button_label(self) -> &'static str {
        match self {
            DriveIntent::Forward => "⬆️",
            DriveIntent::Backward => "⬇️",
            DriveIntent::Left => "⬅️",
            DriveIntent::Right => "➡️",
        }
    }
}

/// The car's grid position. Starts at the origin.
///
/// Components are 64-bit, so no sequence of unit steps a player can produce
/// comes near the range limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CarPosition(pub I64Vec3);

impl CarPosition {
    /// The starting position.
    pub const ORIGIN: CarPosition = CarPosition(I64Vec3::ZERO);

    /// Create a position from components.
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self(I64Vec3::new(x, y, z))
    }

    /// Next position after applying `intent`.
    #[must_use]
    pub fn step(self, intent: DriveIntent) -> Self {
        Self(self.0.saturating_add(intent.delta()))
    }

    /// World-space translation for the car's transform.
    pub fn translation(self) -> Vec3 {
        self.0.as_vec3()
    }
}
