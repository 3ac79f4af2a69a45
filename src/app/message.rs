// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::commentary;
use crate::ui::navbar;
use crate::video_player;
use iced::window;

/// Top-level messages consumed by `App::update`. The variants forward
/// component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Navbar(navbar::Message),
    Commentary(commentary::Message),
    Player(video_player::Message),
    /// Window close was requested (user clicked X or pressed Alt+F4).
    WindowCloseRequested(window::Id),
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `PITCHSIDE_CONFIG_DIR`.
    pub config_dir: Option<String>,
    /// Overrides `[feed] api_base_url`.
    pub api_base_url: Option<String>,
    /// Overrides `[video] source`.
    pub video_path: Option<String>,
}
