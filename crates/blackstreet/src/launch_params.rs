//! Launch parameter parsing for the client.
//!
//! On native, parameters are parsed from command-line arguments using clap.
//! On WASM, defaults are used (CLI argument parsing is not available).

use std::time::Duration;

use bevy::prelude::*;
use blackstreet_core::OverlayConfig;

/// Launch parameters for the client.
#[derive(Resource, Debug, Clone, Default)]
pub struct LaunchParams {
    /// Loading overlay timing.
    pub overlay: OverlayConfig,
    /// Start on the gameplay route instead of the start modal.
    pub skip_intro: bool,
    /// Never start background music.
    pub mute: bool,
}

/// Convert a timeout in whole seconds into an overlay timeout, where zero disables it.
#[cfg_attr(target_family = "wasm", allow(dead_code))]
fn load_timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then_some(Duration::from_secs(secs))
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use blackstreet_core::overlay::{DEFAULT_LOAD_TIMEOUT, DEFAULT_SETTLE_MS};
    use clap::{CommandFactory, Parser, error::ErrorKind};

    use super::*;

    #[derive(Parser)]
    #[command(about = "Black Street X")]
    pub(super) struct CliArgs {
        /// Delay in milliseconds between assets finishing and the scene becoming interactive.
        #[arg(long, default_value_t = DEFAULT_SETTLE_MS)]
        pub settle_ms: u64,

        /// Seconds to wait for assets before showing the retry prompt (0 waits forever).
        #[arg(long, default_value_t = DEFAULT_LOAD_TIMEOUT.as_secs())]
        pub load_timeout_secs: u64,

        /// Go straight to the city scene.
        #[arg(long)]
        pub skip_intro: bool,

        /// Disable background music.
        #[arg(long)]
        pub mute: bool,
    }

    impl From<CliArgs> for LaunchParams {
        fn from(args: CliArgs) -> Self {
            LaunchParams {
                overlay: OverlayConfig {
                    settle_delay: Duration::from_millis(args.settle_ms),
                    load_timeout: load_timeout_from_secs(args.load_timeout_secs),
                },
                skip_intro: args.skip_intro,
                mute: args.mute,
            }
        }
    }

    pub fn parse() -> LaunchParams {
        let params = LaunchParams::from(CliArgs::parse());
        if let Err(e) = params.overlay.validate() {
            CliArgs::command()
                .error(ErrorKind::ValueValidation, e)
                .exit();
        }
        params
    }
}

/// Parse launch parameters from CLI args (native) or use defaults (WASM).
pub fn parse() -> LaunchParams {
    #[cfg(not(target_family = "wasm"))]
    {
        native::parse()
    }
    #[cfg(target_family = "wasm")]
    {
        LaunchParams::default()
    }
}
