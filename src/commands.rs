//! Static command registry backing the root menu.
//!
//! `action` is either forwarded verbatim over IPC, or one of the special
//! forms handled by the dispatcher (`search`, `mpv-play <path>`).
//! Description (and optional title) strings are templates rendered
//! against the live snapshot just before display.

pub const SEARCH_ACTION: &str = "search";
pub const PLAY_ACTION_PREFIX: &str = "mpv-play ";

#[derive(Debug, Clone, Copy)]
pub struct Command {
    /// Stable key the fuzzy filter matches against; also the default title.
    pub key: &'static str,
    /// Dynamic title template; falls back to `key` when it renders empty.
    pub title: Option<&'static str>,
    pub description: &'static str,
    pub action: &'static str,
    /// Whether acting on this entry should dismiss the launcher menu.
    pub closes_menu: bool,
}

static REGISTRY: [Command; 10] = [
    Command {
        key: "now playing",
        title: Some("{current-track}"),
        description: "{time-pos-hour}:{time-pos-min}:{time-pos-sec} / {duration-hour}:{duration-min}:{duration-sec}",
        action: "cycle pause",
        closes_menu: true,
    },
    Command {
        key: "search",
        title: None,
        description: "Search the music library for a playlist to play",
        action: SEARCH_ACTION,
        closes_menu: false,
    },
    Command {
        key: "play/pause",
        title: None,
        description: "Play or pause the current song",
        action: "cycle pause",
        closes_menu: true,
    },
    Command {
        key: "next",
        title: None,
        description: "Skip to {next-track}",
        action: "playlist-next",
        closes_menu: true,
    },
    Command {
        key: "previous",
        title: None,
        description: "Back to {previous-track}",
        action: "playlist-prev",
        closes_menu: true,
    },
    Command {
        key: "shuffle",
        title: None,
        description: "Shuffle the playlist {playlist-name}",
        action: "playlist-shuffle",
        closes_menu: true,
    },
    Command {
        key: "mute/unmute",
        title: None,
        description: "Toggle mute (currently muted: {mute})",
        action: "cycle mute",
        closes_menu: true,
    },
    Command {
        key: "volume up",
        title: None,
        description: "Volume: {volume:.0}%",
        action: "add volume 5",
        closes_menu: false,
    },
    Command {
        key: "volume down",
        title: None,
        description: "Volume: {volume:.0}%",
        action: "add volume -5",
        closes_menu: false,
    },
    Command {
        key: "stop",
        title: None,
        description: "Stop playback and clear the playlist",
        action: "stop",
        closes_menu: true,
    },
];

pub fn registry() -> &'static [Command] {
    &REGISTRY
}

/// Look up a command by its key.
pub fn by_key(key: &str) -> Option<&'static Command> {
    REGISTRY.iter().find(|cmd| cmd.key == key)
}

/// The single entry offered while the player is not running.
pub fn search_command() -> &'static Command {
    by_key("search").expect("search command is registered")
}
