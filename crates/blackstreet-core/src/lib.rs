//! Engine-independent state for Black Street X.
//!
//! Everything in here is plain data plus pure transitions, so it can be
//! driven from the Bevy client, from tests, or from any other frontend:
//!
//! - [`progress`]: aggregates per-resource load status into one percentage.
//! - [`overlay`]: the loading overlay state machine (loading, settling, done).
//! - [`drive`]: the car position and the reducer that steps it.
//! - [`menu`]: routes, menu entries and the start-screen audio gate.

pub mod drive;
mod error;
pub mod menu;
pub mod overlay;
pub mod progress;

pub use drive::{CarPosition, DriveIntent};
pub use error::{Error, Result};
pub use menu::{LandingView, MenuEntry, MusicPlayer, Route};
pub use overlay::{LoadingOverlay, OverlayConfig, OverlayEvent, OverlayPhase};
pub use progress::{LoadStatus, ProgressTracker};
