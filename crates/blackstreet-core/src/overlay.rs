//! Loading overlay state machine.
//!
//! ```text
//! Loading --(progress reaches 100)--> Settling --(settle delay elapsed)--> Done
//!    |
//!    +--(load timeout elapsed)--> Failed
//! ```
//!
//! Time is passed in explicitly as a [`Duration`] since some fixed epoch
//! (the client uses the engine clock's elapsed time), which keeps the
//! machine deterministic under test.
//!
//! Once `Settling` has been entered the overlay is latched: later progress
//! values, including regressions below 100, are still displayed but never
//! cancel the settle timer.

use std::time::Duration;

use crate::error::{Error, Result};

/// Pause between progress completion and the scene becoming interactive, in milliseconds.
pub const DEFAULT_SETTLE_MS: u64 = 500;

/// [`DEFAULT_SETTLE_MS`] as a duration.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(DEFAULT_SETTLE_MS);

/// How long loading may stall before the overlay gives up.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest settle delay accepted by [`OverlayConfig::validate`].
const MAX_SETTLE_DELAY: Duration = Duration::from_secs(10);

/// Progress value at which loading counts as complete.
const COMPLETE: f32 = 100.0;

/// Overlay timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Delay between first observing 100% and finishing.
    pub settle_delay: Duration,
    /// Maximum time spent in `Loading`. `None` waits forever.
    pub load_timeout: Option<Duration>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            load_timeout: Some(DEFAULT_LOAD_TIMEOUT),
        }
    }
}

impl OverlayConfig {
    /// Reject settings that would make the overlay unusable.
    pub fn validate(&self) -> Result<()> {
        if self.settle_delay > MAX_SETTLE_DELAY {
            return Err(Error::InvalidConfig {
                field: "settle_delay",
                detail: format!(
                    "{} ms exceeds the {} ms maximum",
                    self.settle_delay.as_millis(),
                    MAX_SETTLE_DELAY.as_millis()
                ),
            });
        }
        if self.load_timeout == Some(Duration::ZERO) {
            return Err(Error::InvalidConfig {
                field: "load_timeout",
                detail: "must be positive; use None to disable".to_string(),
            });
        }
        Ok(())
    }
}

/// Current phase of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    /// Waiting for progress to reach 100.
    Loading,
    /// Progress reached 100 at `since`; waiting out the settle delay.
    Settling {
        /// Time at which 100 was first observed.
        since: Duration,
    },
    /// Overlay finished and should be removed.
    Done,
    /// Loading stalled past the timeout.
    Failed,
}

/// Transition notifications returned by [`LoadingOverlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    /// Entered `Settling`.
    Settling,
    /// Entered `Done`. Emitted exactly once per overlay.
    Finished,
    /// Entered `Failed`.
    TimedOut,
}

/// The loading overlay for one mount of the gameplay screen.
#[derive(Debug, Clone)]
pub struct LoadingOverlay {
    config: OverlayConfig,
    phase: OverlayPhase,
    started_at: Duration,
    progress: f32,
}

impl LoadingOverlay {
    /// Create an overlay in `Loading`, mounted at `now`.
    pub fn new(config: OverlayConfig, now: Duration) -> Self {
        Self {
            config,
            phase: OverlayPhase::Loading,
            started_at: now,
            progress: 0.0,
        }
    }

    /// Feed the latest progress value.
    ///
    /// The displayed value always follows the input; only the first value at
    /// or above 100 seen while `Loading` starts the settle timer.
    pub fn observe(&mut self, progress: f32, now: Duration) -> Option<OverlayEvent> {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, COMPLETE)
        };

        if self.phase == OverlayPhase::Loading && self.progress >= COMPLETE {
            self.phase = OverlayPhase::Settling { since: now };
            return Some(OverlayEvent::Settling);
        }
        None
    }

    /// Advance timers.
    pub fn tick(&mut self, now: Duration) -> Option<OverlayEvent> {
        match self.phase {
            OverlayPhase::Settling { since }
                if now.saturating_sub(since) >= self.config.settle_delay =>
            {
                self.phase = OverlayPhase::Done;
                Some(OverlayEvent::Finished)
            }
            OverlayPhase::Loading => {
                let timeout = self.config.load_timeout?;
                if now.saturating_sub(self.started_at) >= timeout {
                    self.phase = OverlayPhase::Failed;
                    Some(OverlayEvent::TimedOut)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    /// Whole-number percentage for the readout.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(&self) -> u32 {
        self.progress.floor() as u32
    }

    /// Fill fraction of the progress bar in `[0, 1]`.
    pub fn fill(&self) -> f32 {
        self.progress / COMPLETE
    }

    /// Whether the overlay still blocks the scene.
    pub fn is_visible(&self) -> bool {
        self.phase != OverlayPhase::Done
    }

    /// Whether the scene is ready for interaction.
    pub fn is_ready(&self) -> bool {
        self.phase == OverlayPhase::Done
    }

    /// Whether loading timed out.
    pub fn is_failed(&self) -> bool {
        self.phase == OverlayPhase::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn no_timeout() -> OverlayConfig {
        OverlayConfig {
            load_timeout: None,
            ..OverlayConfig::default()
        }
    }

    #[test]
    fn test_progress_sequence_settles_then_finishes() {
        let mut overlay = LoadingOverlay::new(no_timeout(), ms(0));

        assert_eq!(overlay.observe(0.0, ms(0)), None);
        assert_eq!(overlay.tick(ms(0)), None);
        assert_eq!(overlay.observe(40.0, ms(100)), None);
        assert_eq!(overlay.tick(ms(100)), None);
        assert_eq!(overlay.phase(), OverlayPhase::Loading);

        assert_eq!(overlay.observe(100.0, ms(250)), Some(OverlayEvent::Settling));
        assert_eq!(overlay.phase(), OverlayPhase::Settling { since: ms(250) });

        assert_eq!(overlay.tick(ms(749)), None);
        assert!(overlay.is_visible());
        assert_eq!(overlay.tick(ms(750)), Some(OverlayEvent::Finished));
        assert!(overlay.is_ready());
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_regression_during_settle_does_not_cancel() {
        let mut overlay = LoadingOverlay::new(no_timeout(), ms(0));
        overlay.observe(100.0, ms(1000));

        // Loader reports a regression mid-settle.
        assert_eq!(overlay.observe(60.0, ms(1200)), None);
        assert_eq!(overlay.percent(), 60);
        assert_eq!(overlay.tick(ms(1200)), None);

        // Returning to 100 does not restart the timer either.
        assert_eq!(overlay.observe(100.0, ms(1300)), None);
        assert_eq!(overlay.tick(ms(1500)), Some(OverlayEvent::Finished));
    }

    #[test]
    fn test_finished_fires_exactly_once() {
        let mut overlay = LoadingOverlay::new(no_timeout(), ms(0));
        overlay.observe(100.0, ms(0));

        let finished = (0..20)
            .map(|frame| overlay.tick(ms(frame * 100)))
            .filter(|event| *event == Some(OverlayEvent::Finished))
            .count();
        assert_eq!(finished, 1);

        // Terminal: more progress changes nothing.
        assert_eq!(overlay.observe(100.0, ms(5000)), None);
        assert_eq!(overlay.tick(ms(6000)), None);
    }

    #[test]
    fn test_never_finishes_before_complete() {
        let mut overlay = LoadingOverlay::new(no_timeout(), ms(0));
        for step in 0..100 {
            overlay.observe(99.9, ms(step * 50));
            assert_eq!(overlay.tick(ms(step * 50)), None);
        }
        assert_eq!(overlay.phase(), OverlayPhase::Loading);
    }

    #[test]
    fn test_zero_settle_delay_finishes_same_frame() {
        let config = OverlayConfig {
            settle_delay: Duration::ZERO,
            load_timeout: None,
        };
        let mut overlay = LoadingOverlay::new(config, ms(0));
        overlay.observe(100.0, ms(10));
        assert_eq!(overlay.tick(ms(10)), Some(OverlayEvent::Finished));
    }

    #[test]
    fn test_readout_and_fill() {
        let mut overlay = LoadingOverlay::new(no_timeout(), ms(0));
        overlay.observe(49.99, ms(0));
        assert_eq!(overlay.percent(), 49);
        assert!((overlay.fill() - 0.4999).abs() < 1e-6);

        overlay.observe(f32::NAN, ms(0));
        assert_eq!(overlay.percent(), 0);

        overlay.observe(140.0, ms(0));
        assert_eq!(overlay.percent(), 100);
        assert_eq!(overlay.fill(), 1.0);
    }

    #[test]
    fn test_timeout_fails_stalled_load() {
        let config = OverlayConfig {
            settle_delay: DEFAULT_SETTLE_DELAY,
            load_timeout: Some(Duration::from_secs(5)),
        };
        let mut overlay = LoadingOverlay::new(config, Duration::from_secs(2));
        overlay.observe(50.0, Duration::from_secs(3));
        assert_eq!(overlay.tick(Duration::from_secs(6)), None);
        assert_eq!(
            overlay.tick(Duration::from_secs(7)),
            Some(OverlayEvent::TimedOut)
        );
        assert!(overlay.is_failed());
        assert!(overlay.is_visible());

        // A late completion cannot revive a failed overlay.
        assert_eq!(overlay.observe(100.0, Duration::from_secs(8)), None);
        assert_eq!(overlay.tick(Duration::from_secs(9)), None);
    }

    #[test]
    fn test_timeout_ignored_once_settling() {
        let config = OverlayConfig {
            settle_delay: Duration::from_secs(2),
            load_timeout: Some(Duration::from_secs(1)),
        };
        let mut overlay = LoadingOverlay::new(config, ms(0));
        overlay.observe(100.0, ms(900));
        assert_eq!(overlay.tick(ms(1500)), None);
        assert_eq!(overlay.tick(ms(2900)), Some(OverlayEvent::Finished));
    }

    #[test]
    fn test_validate() {
        assert!(OverlayConfig::default().validate().is_ok());
        assert!(no_timeout().validate().is_ok());

        let zero_timeout = OverlayConfig {
            load_timeout: Some(Duration::ZERO),
            ..OverlayConfig::default()
        };
        assert!(matches!(
            zero_timeout.validate(),
            Err(Error::InvalidConfig {
                field: "load_timeout",
                ..
            })
        ));

        let slow = OverlayConfig {
            settle_delay: Duration::from_secs(60),
            ..OverlayConfig::default()
        };
        assert!(slow.validate().is_err());
    }
}
