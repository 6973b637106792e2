//! Menu composition: which entries are offered for the current query.

use crate::commands::{self, Command, SEARCH_ACTION};
use crate::config::AppConfig;
use crate::filter::FuzzyFilter;
use crate::format;
use crate::ipc::IpcClient;
use crate::library;
use crate::probe::ProcessProbe;
use crate::properties::{PlayerSnapshot, PropertyResolver};
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

pub const MAX_ENTRIES: usize = 8;
/// Executable name probed in the process table.
pub const PLAYER_PROCESS: &str = "mpv";
const ICON: &str = "images/icon.png";

/// Rendering-ready projection handed to the host launcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuEntry {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub action: String,
    pub keep_menu_open: bool,
}

/// Mode governing the candidate set, derived per event from the query
/// prefix and the probe result. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuContext {
    Root,
    Search(String),
    PlayerAbsent,
}

impl MenuContext {
    pub fn determine(query: &str, player_running: bool) -> Self {
        let query = query.trim_start();
        if let Some(rest) = query.strip_prefix("search") {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return MenuContext::Search(rest.trim().to_string());
            }
        }
        if player_running {
            MenuContext::Root
        } else {
            MenuContext::PlayerAbsent
        }
    }
}

pub struct MenuBuilder {
    config: AppConfig,
    probe: ProcessProbe,
    client: IpcClient,
    filter: FuzzyFilter,
}

impl MenuBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self::with_probe(config, ProcessProbe::default())
    }

    /// Build against an alternate process-table root (tests).
    pub fn with_probe(config: AppConfig, probe: ProcessProbe) -> Self {
        let client = IpcClient::new(
            config.socket_path(),
            Duration::from_millis(config.ipc_timeout_ms),
        );
        let filter = FuzzyFilter::new(
            config.matcher_bin.clone(),
            Duration::from_millis(config.matcher_timeout_ms),
        );
        Self {
            config,
            probe,
            client,
            filter,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn client(&self) -> &IpcClient {
        &self.client
    }

    pub fn probe(&self) -> &ProcessProbe {
        &self.probe
    }

    /// Full render path for one query event: probe, resolve, build.
    pub async fn render(&self, query: &str) -> Vec<MenuEntry> {
        let running = self.probe.is_running(PLAYER_PROCESS);
        let context = MenuContext::determine(query, running);
        let snapshot = match &context {
            MenuContext::Root => {
                PropertyResolver::new(&self.client)
                    .resolve_enriched(true)
                    .await
            }
            _ => PlayerSnapshot::default(),
        };
        self.build(&context, &snapshot, query).await
    }

    /// Compose the ordered entry list for an already-determined context.
    pub async fn build(
        &self,
        context: &MenuContext,
        snapshot: &PlayerSnapshot,
        query: &str,
    ) -> Vec<MenuEntry> {
        let mut entries = match context {
            MenuContext::Root => self.build_root(snapshot, query).await,
            MenuContext::PlayerAbsent => vec![project_command(commands::search_command(), snapshot)],
            MenuContext::Search(suffix) => self.build_search(suffix).await,
        };
        entries.truncate(MAX_ENTRIES);
        entries
    }

    async fn build_root(&self, snapshot: &PlayerSnapshot, query: &str) -> Vec<MenuEntry> {
        let keys: Vec<String> = commands::registry()
            .iter()
            .map(|cmd| cmd.key.to_string())
            .collect();
        self.filter
            .filter(query, &keys)
            .await
            .iter()
            .filter_map(|key| commands::by_key(key))
            .map(|cmd| project_command(cmd, snapshot))
            .collect()
    }

    async fn build_search(&self, suffix: &str) -> Vec<MenuEntry> {
        let music_dir = self.config.music_dir();
        let playlists = match library::scan_playlists(&music_dir) {
            Ok(playlists) => playlists,
            Err(err) => {
                warn!("{:#}", err);
                return vec![MenuEntry {
                    title: "Music library unavailable".to_string(),
                    description: format!("Cannot read {}", music_dir.display()),
                    icon: ICON.to_string(),
                    action: SEARCH_ACTION.to_string(),
                    keep_menu_open: true,
                }];
            }
        };
        let names: Vec<String> = playlists.iter().map(|p| p.name.clone()).collect();
        self.filter
            .filter(suffix, &names)
            .await
            .iter()
            .filter_map(|name| playlists.iter().find(|p| &p.name == name))
            .map(|playlist| MenuEntry {
                title: playlist.name.clone(),
                description: track_count_label(playlist.track_count),
                icon: ICON.to_string(),
                action: format!("mpv-play {}", playlist.path.display()),
                keep_menu_open: true,
            })
            .collect()
    }
}

fn track_count_label(count: usize) -> String {
    if count == 1 {
        "1 track".to_string()
    } else {
        format!("{} tracks", count)
    }
}

fn project_command(cmd: &Command, snapshot: &PlayerSnapshot) -> MenuEntry {
    let title = match cmd.title {
        Some(template) => {
            let rendered = format::render(template, snapshot);
            if rendered.is_empty() || rendered == template {
                cmd.key.to_string()
            } else {
                rendered
            }
        }
        None => cmd.key.to_string(),
    };
    MenuEntry {
        title,
        description: format::render(cmd.description, snapshot),
        icon: ICON.to_string(),
        action: cmd.action.to_string(),
        keep_menu_open: !cmd.closes_menu,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_config() -> AppConfig {
        AppConfig {
            socket_path: "/nonexistent/mpvmenu-test-socket".to_string(),
            matcher_bin: "mpvmenu-no-such-matcher".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_context_determination() {
        assert_eq!(MenuContext::determine("", true), MenuContext::Root);
        assert_eq!(MenuContext::determine("", false), MenuContext::PlayerAbsent);
        assert_eq!(MenuContext::determine("vol", true), MenuContext::Root);
        assert_eq!(
            MenuContext::determine("search", false),
            MenuContext::Search(String::new())
        );
        assert_eq!(
            MenuContext::determine("search jazz", true),
            MenuContext::Search("jazz".to_string())
        );
        // not the search keyword
        assert_eq!(MenuContext::determine("searching", true), MenuContext::Root);
    }

    #[tokio::test]
    async fn test_player_absent_offers_only_search() {
        let builder = MenuBuilder::new(test_config());
        let entries = builder
            .build(&MenuContext::PlayerAbsent, &PlayerSnapshot::default(), "")
            .await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, SEARCH_ACTION);
        assert!(entries[0].keep_menu_open);
    }

    #[tokio::test]
    async fn test_root_menu_is_capped() {
        let builder = MenuBuilder::new(test_config());
        let entries = builder
            .build(&MenuContext::Root, &PlayerSnapshot::default(), "")
            .await;
        assert!(entries.len() <= MAX_ENTRIES);
        assert_eq!(entries.len(), MAX_ENTRIES);
    }

    #[tokio::test]
    async fn test_root_menu_filters_by_query() {
        let builder = MenuBuilder::new(test_config());
        let entries = builder
            .build(&MenuContext::Root, &PlayerSnapshot::default(), "volume")
            .await;
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["volume up", "volume down"]);
    }

    #[tokio::test]
    async fn test_now_playing_title_uses_snapshot() {
        let builder = MenuBuilder::new(test_config());
        let mut snapshot = PlayerSnapshot::default();
        snapshot.insert("current-track", json!("So What"));
        let entries = builder
            .build(&MenuContext::Root, &snapshot, "now")
            .await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "So What");
    }

    #[tokio::test]
    async fn test_now_playing_title_falls_back_to_key() {
        let builder = MenuBuilder::new(test_config());
        let entries = builder
            .build(&MenuContext::Root, &PlayerSnapshot::default(), "now")
            .await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "now playing");
    }

    #[tokio::test]
    async fn test_unreadable_music_root_yields_unavailable_entry() {
        let mut config = test_config();
        config.music_dir = "/nonexistent/mpvmenu-test-music".to_string();
        let builder = MenuBuilder::new(config);
        let entries = builder
            .build(
                &MenuContext::Search(String::new()),
                &PlayerSnapshot::default(),
                "search",
            )
            .await;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].title.contains("unavailable"));
        assert!(entries[0].keep_menu_open);
    }
}
