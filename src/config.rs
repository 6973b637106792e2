use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to mpv's JSON IPC socket (`--input-ipc-server`).
    #[serde(default = "default_socket_path")]
    pub socket_path: String,
    /// Root directory whose subdirectories are offered as playlists.
    #[serde(default = "default_music_dir")]
    pub music_dir: String,
    /// Player binary spawned for playlist launches.
    #[serde(default = "default_player_bin")]
    pub player_bin: String,
    /// External fuzzy matcher (fzf-compatible: `-f <query>`, candidates on stdin).
    #[serde(default = "default_matcher_bin")]
    pub matcher_bin: String,
    /// Per-call socket I/O bound, milliseconds.
    #[serde(default = "default_ipc_timeout_ms")]
    pub ipc_timeout_ms: u64,
    /// Bound on one external matcher invocation, milliseconds.
    #[serde(default = "default_matcher_timeout_ms")]
    pub matcher_timeout_ms: u64,
    /// Pause between sending a control command and re-reading player state.
    /// A heuristic settle window, not an acknowledgement.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_socket_path() -> String {
    "~/.config/mpv/socket".to_string()
}

fn default_music_dir() -> String {
    "~/Music".to_string()
}

fn default_player_bin() -> String {
    "mpv".to_string()
}

fn default_matcher_bin() -> String {
    "fzf".to_string()
}

fn default_ipc_timeout_ms() -> u64 {
    500
}

fn default_matcher_timeout_ms() -> u64 {
    1000
}

fn default_settle_ms() -> u64 {
    40
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            music_dir: default_music_dir(),
            player_bin: default_player_bin(),
            matcher_bin: default_matcher_bin(),
            ipc_timeout_ms: default_ipc_timeout_ms(),
            matcher_timeout_ms: default_matcher_timeout_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl AppConfig {
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("mpvmenu");
        std::fs::create_dir_all(&path).ok();
        path.push("config.toml");
        path
    }

    pub fn load() -> Self {
        let path = Self::get_config_path();
        if path.exists() {
            if let Ok(content) = fs::read_to_string(&path) {
                if let Ok(config) = toml::from_str(&content) {
                    return config;
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        let path = Self::get_config_path();
        if let Ok(content) = toml::to_string_pretty(self) {
            let _ = fs::write(path, content);
        }
    }

    pub fn socket_path(&self) -> PathBuf {
        expand_home(&self.socket_path)
    }

    pub fn music_dir(&self) -> PathBuf {
        expand_home(&self.music_dir)
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
