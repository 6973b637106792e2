//! Live player state: per-property queries plus derived display fields.

use crate::ipc::{IpcClient, IpcError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Properties read for every menu render.
pub const BASE_PROPERTIES: &[&str] = &[
    "volume",
    "mute",
    "pause",
    "idle-active",
    "time-pos",
    "duration",
    "playlist-pos",
    "playlist-count",
    "filename",
    "path",
];

/// Point-in-time property map. Built fresh per render, never cached;
/// a failed property is `Null`, a failed derivation an empty default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerSnapshot {
    values: BTreeMap<String, Value>,
}

impl PlayerSnapshot {
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_f64(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    pub fn as_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }
}

pub struct PropertyResolver<'a> {
    client: &'a IpcClient,
}

impl<'a> PropertyResolver<'a> {
    pub fn new(client: &'a IpcClient) -> Self {
        Self { client }
    }

    /// Resolve exactly `names`: one socket query per name, failures
    /// isolated to a `Null` entry for that key. With the player absent
    /// an empty snapshot is returned without touching the socket.
    pub async fn resolve(&self, names: &[&str], player_running: bool) -> PlayerSnapshot {
        let mut snapshot = PlayerSnapshot::default();
        if !player_running {
            return snapshot;
        }
        for name in names {
            snapshot.insert(*name, self.fetch(name).await);
        }
        snapshot
    }

    /// Full render snapshot: the base batch, the neighbouring playlist
    /// entries, then the derived fields.
    pub async fn resolve_enriched(&self, player_running: bool) -> PlayerSnapshot {
        let mut snapshot = self.resolve(BASE_PROPERTIES, player_running).await;
        if player_running {
            self.resolve_playlist_neighbours(&mut snapshot).await;
        }
        derive_fields(&mut snapshot);
        snapshot
    }

    async fn fetch(&self, name: &str) -> Value {
        match self.client.get_property(name).await {
            Ok(value) => value,
            Err(IpcError::NotConnected) => {
                debug!("player gone while resolving {}", name);
                Value::Null
            }
            Err(err) => {
                warn!("property {}: {}", name, err);
                Value::Null
            }
        }
    }

    /// Fetch the playlist filenames at relative offset -1/0/+1 so track
    /// names can be derived without another round-trip later.
    async fn resolve_playlist_neighbours(&self, snapshot: &mut PlayerSnapshot) {
        let pos = match snapshot.as_f64("playlist-pos") {
            Some(pos) if pos >= 0.0 => pos as i64,
            _ => return,
        };
        for offset in [-1i64, 0, 1] {
            let index = pos + offset;
            if index < 0 {
                continue;
            }
            let name = format!("playlist/{}/filename", index);
            let value = self.fetch(&name).await;
            snapshot.insert(name, value);
        }
    }
}

/// Compute display fields from already-resolved values. Every failure
/// collapses to a default; this pass cannot error.
fn derive_fields(snapshot: &mut PlayerSnapshot) {
    let (hour, min, sec) = split_time(snapshot.as_f64("time-pos"));
    snapshot.insert("time-pos-hour", Value::String(hour));
    snapshot.insert("time-pos-min", Value::String(min));
    snapshot.insert("time-pos-sec", Value::String(sec));

    let (hour, min, sec) = split_time(snapshot.as_f64("duration"));
    snapshot.insert("duration-hour", Value::String(hour));
    snapshot.insert("duration-min", Value::String(min));
    snapshot.insert("duration-sec", Value::String(sec));

    let pos = snapshot.as_f64("playlist-pos").map(|p| p as i64);
    for (field, offset) in [("previous-track", -1i64), ("current-track", 0), ("next-track", 1)] {
        let mut track = pos
            .map(|p| p + offset)
            .filter(|index| *index >= 0)
            .and_then(|index| {
                snapshot
                    .as_str(&format!("playlist/{}/filename", index))
                    .map(track_stem)
            })
            .unwrap_or_default();
        if field == "current-track" && track.is_empty() {
            track = snapshot.as_str("filename").map(track_stem).unwrap_or_default();
        }
        snapshot.insert(field, Value::String(track));
    }

    let playlist_name = snapshot
        .as_str("path")
        .and_then(|p| Path::new(p).parent())
        .and_then(|dir| dir.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    snapshot.insert("playlist-name", Value::String(playlist_name));
}

/// Split seconds into (h, mm, ss) display components. Missing or
/// negative input degrades to zeros.
fn split_time(seconds: Option<f64>) -> (String, String, String) {
    let total = seconds.filter(|s| s.is_finite() && *s >= 0.0).unwrap_or(0.0) as u64;
    (
        format!("{}", total / 3600),
        format!("{:02}", (total % 3600) / 60),
        format!("{:02}", total % 60),
    )
}

/// Basename without extension, e.g. "07 - So What.flac" → "07 - So What".
fn track_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
