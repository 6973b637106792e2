//! Candidate filtering: external fuzzy matcher with a substring fallback.

use std::process::Stdio;
use std::sync::Once;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

static FALLBACK_WARNED: Once = Once::new();

pub struct FuzzyFilter {
    program: String,
    timeout: Duration,
}

impl Default for FuzzyFilter {
    fn default() -> Self {
        Self::new("fzf", Duration::from_secs(1))
    }
}

impl FuzzyFilter {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Rank `candidates` against `query`.
    ///
    /// Empty query: all candidates, sorted ascending (root menu order).
    /// Otherwise the external matcher gets the candidates newline-joined
    /// on stdin and its ranked stdout lines are returned. A missing
    /// matcher degrades to case-insensitive substring filtering in input
    /// order; a timeout or non-zero exit means "no matches", not an error.
    pub async fn filter(&self, query: &str, candidates: &[String]) -> Vec<String> {
        if query.is_empty() {
            let mut all = candidates.to_vec();
            all.sort();
            return all;
        }

        let mut child = match Command::new(&self.program)
            .arg("-f")
            .arg(query)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                FALLBACK_WARNED.call_once(|| {
                    warn!("matcher {:?} unavailable ({}), using substring filter", self.program, err);
                });
                return substring_filter(query, candidates);
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            let mut input = candidates.join("\n");
            input.push('\n');
            // The matcher may exit before draining stdin; a broken pipe
            // here is handled like any other non-zero outcome below.
            let _ = stdin.write_all(input.as_bytes()).await;
        }

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) if output.status.success() => String::from_utf8_lossy(&output.stdout)
                .lines()
                .map(str::to_string)
                .collect(),
            Ok(_) => {
                debug!("matcher returned no matches for {:?}", query);
                Vec::new()
            }
            Err(_) => {
                warn!("matcher timed out after {:?}", self.timeout);
                Vec::new()
            }
        }
    }
}

fn substring_filter(query: &str, candidates: &[String]) -> Vec<String> {
    let needle = query.to_lowercase();
    candidates
        .iter()
        .filter(|candidate| candidate.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
