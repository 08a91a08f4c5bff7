//! Routes, menu entries and the start-screen audio gate.

use tracing::warn;

use crate::error::Result;

/// Game title shown on the main menu card.
pub const TITLE: &str = "🏁 Black Street X";

/// Heading of the start modal.
pub const START_PROMPT: &str = "Ready to Race?";

/// Label of the start modal's button.
pub const START_BUTTON: &str = "Start Game";

/// Top-level routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    /// Start modal and main menu.
    #[default]
    Landing,
    /// Loading overlay and drivable scene.
    Gameplay,
}

/// What the landing route is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LandingView {
    /// Full-screen modal gating background audio.
    #[default]
    StartModal,
    /// The menu card.
    MainMenu,
}

/// Entries on the main menu card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuEntry {
    CareerMode,
    Multiplayer,
    Settings,
}

impl MenuEntry {
    /// Entries in display order.
    pub const ALL: [MenuEntry; 3] = [
        MenuEntry::CareerMode,
        MenuEntry::Multiplayer,
        MenuEntry::Settings,
    ];

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            MenuEntry::CareerMode => "Career Mode",
            MenuEntry::Multiplayer => "Multiplayer",
            MenuEntry::Settings => "Settings",
        }
    }

    /// Route this entry links to.
    pub fn destination(self) -> Route {
        match self {
            MenuEntry::CareerMode => Route::Gameplay,
            MenuEntry::Multiplayer | MenuEntry::Settings => Route::Landing,
        }
    }

    /// Whether the entry is a placeholder linking back to the landing route.
    pub fn is_placeholder(self) -> bool {
        self.destination() == Route::Landing
    }
}

/// Something that can start the background track.
pub trait MusicPlayer {
    /// Begin playback.
    ///
    /// Platforms may refuse (blocked autoplay, missing or undecodable audio).
    fn play(&mut self) -> Result<()>;
}

/// Dismiss the start modal, attempting to start background music on the way.
///
/// Playback failure is logged and otherwise ignored; the view always advances
/// to the main menu.
pub fn dismiss_start_modal(player: &mut impl MusicPlayer) -> LandingView {
    if let Err(e) = player.play() {
        warn!("Autoplay failed: {e}");
    }
    LandingView::MainMenu
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct RecordingPlayer {
        attempts: usize,
        refuse: bool,
    }

    impl MusicPlayer for RecordingPlayer {
        fn play(&mut self) -> Result<()> {
            self.attempts += 1;
            if self.refuse {
                Err(Error::AudioUnavailable {
                    reason: "autoplay blocked".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_dismiss_starts_music() {
        let mut player = RecordingPlayer {
            attempts: 0,
            refuse: false,
        };
        assert_eq!(dismiss_start_modal(&mut player), LandingView::MainMenu);
        assert_eq!(player.attempts, 1);
    }

    #[test]
    fn test_dismiss_survives_refused_playback() {
        let mut player = RecordingPlayer {
            attempts: 0,
            refuse: true,
        };
        assert_eq!(dismiss_start_modal(&mut player), LandingView::MainMenu);
        assert_eq!(player.attempts, 1);
    }

    #[test]
    fn test_menu_destinations() {
        assert_eq!(MenuEntry::CareerMode.destination(), Route::Gameplay);
        assert!(!MenuEntry::CareerMode.is_placeholder());
        assert!(MenuEntry::Multiplayer.is_placeholder());
        assert!(MenuEntry::Settings.is_placeholder());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Route::default(), Route::Landing);
        assert_eq!(LandingView::default(), LandingView::StartModal);
    }
}
