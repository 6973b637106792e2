//! Selection handling: spawn a player, switch context, or forward a
//! control command and re-render.
//!
//! Dispatches are best-effort: no retry, no cancellation, and the settle
//! pause after a control command is a heuristic window, not an
//! acknowledgement from the player.

use crate::commands::{PLAY_ACTION_PREFIX, SEARCH_ACTION};
use crate::ipc::IpcError;
use crate::menu::{MenuBuilder, MenuEntry, PLAYER_PROCESS};
use std::process::Stdio;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispatchPhase {
    Idle,
    Dispatching,
    Refreshing,
}

/// What the host should do after a selection was handled.
#[derive(Debug, PartialEq)]
pub enum DispatchOutcome {
    /// Menu is done; nothing further to show.
    Closed,
    /// Show these entries and adopt `query` as the active query string.
    Refresh {
        query: String,
        entries: Vec<MenuEntry>,
    },
}

pub struct ActionDispatcher {
    builder: MenuBuilder,
    phase: DispatchPhase,
}

impl ActionDispatcher {
    pub fn new(builder: MenuBuilder) -> Self {
        Self {
            builder,
            phase: DispatchPhase::Idle,
        }
    }

    pub fn phase(&self) -> DispatchPhase {
        self.phase
    }

    pub fn builder(&self) -> &MenuBuilder {
        &self.builder
    }

    /// Handle one selected entry. `query` is the query string that was
    /// active when the entry was chosen; the outcome hands back the
    /// follow-up query so the host owns that state.
    pub async fn dispatch(
        &mut self,
        action: &str,
        keep_menu_open: bool,
        query: &str,
    ) -> DispatchOutcome {
        self.phase = DispatchPhase::Dispatching;
        let outcome = if let Some(path) = action.strip_prefix(PLAY_ACTION_PREFIX) {
            self.spawn_player(path.trim());
            DispatchOutcome::Closed
        } else if action == SEARCH_ACTION {
            self.phase = DispatchPhase::Refreshing;
            let query = "search ".to_string();
            let entries = self.builder.render(&query).await;
            DispatchOutcome::Refresh { query, entries }
        } else {
            self.forward_control(action).await;
            if keep_menu_open {
                tokio::time::sleep(Duration::from_millis(self.builder.config().settle_ms)).await;
                self.phase = DispatchPhase::Refreshing;
                let entries = self.builder.render(query).await;
                DispatchOutcome::Refresh {
                    query: query.to_string(),
                    entries,
                }
            } else {
                DispatchOutcome::Closed
            }
        };
        self.phase = DispatchPhase::Idle;
        outcome
    }

    async fn forward_control(&self, action: &str) {
        match self.builder.client().send(action).await {
            Ok(()) => debug!("sent control command {:?}", action),
            // Expected while the player is down; the menu already degraded.
            Err(IpcError::NotConnected) => debug!("player not running, dropped {:?}", action),
            Err(err) => warn!("control command {:?}: {}", action, err),
        }
    }

    /// Launch the player against a playlist directory as a detached
    /// child. The new instance takes over the configured IPC socket so
    /// later menus control it.
    fn spawn_player(&self, dir: &str) {
        let config = self.builder.config();
        let player = config.player_bin.clone();
        let socket = config.socket_path();
        let spawned = tokio::process::Command::new(&player)
            .arg(format!("--input-ipc-server={}", socket.display()))
            .arg(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(_child) => {
                info!("spawned {} for {:?}", player, dir);
                // Bounded spawn confirmation; purely informational.
                let probe = self.builder.probe().clone();
                tokio::spawn(async move {
                    for _ in 0..10 {
                        if probe.is_running(PLAYER_PROCESS) {
                            debug!("{} is up", PLAYER_PROCESS);
                            return;
                        }
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                    warn!("{} did not appear within 1s of spawning", PLAYER_PROCESS);
                });
            }
            Err(err) => warn!("failed to spawn {}: {}", player, err),
        }
    }
}
