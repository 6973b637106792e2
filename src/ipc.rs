//! One-shot JSON IPC client for mpv's `--input-ipc-server` socket.
//!
//! Every call opens a fresh connection, exchanges at most one line each
//! way, and closes. No pooling, no retries. A missing socket is the
//! normal "player not running" state, not a failure worth logging.

use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

#[derive(Debug, Error)]
pub enum IpcError {
    /// Socket path absent or connection refused, the normal state while mpv is down.
    #[error("player socket not available")]
    NotConnected,
    /// Reply was not a well-formed mpv IPC response.
    #[error("malformed player response: {0}")]
    Protocol(String),
    /// Socket I/O exceeded the configured bound.
    #[error("player response timed out")]
    Timeout,
}

pub struct IpcClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl IpcClient {
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout,
        }
    }

    async fn connect(&self) -> Result<UnixStream, IpcError> {
        let connect = UnixStream::connect(&self.socket_path);
        match tokio::time::timeout(self.timeout, connect).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(_)) => Err(IpcError::NotConnected),
            Err(_) => Err(IpcError::Timeout),
        }
    }

    /// Send one control command, fire-and-forget.
    ///
    /// The verbatim command line ("add volume 5") is split into the
    /// `{"command": [verb, args...]}` array mpv expects. No reply is read.
    pub async fn send(&self, command_line: &str) -> Result<(), IpcError> {
        let args: Vec<&str> = command_line.split_whitespace().collect();
        if args.is_empty() {
            return Err(IpcError::Protocol("empty command".to_string()));
        }
        let payload = encode_command(&args);
        let mut stream = self.connect().await?;
        match tokio::time::timeout(self.timeout, stream.write_all(payload.as_bytes())).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(IpcError::NotConnected),
            Err(_) => Err(IpcError::Timeout),
        }
    }

    /// Query a single property and return its `data` field.
    ///
    /// Booleans arrive as real JSON booleans and stay that way; callers
    /// never see stringly-typed "True"/"False".
    pub async fn get_property(&self, name: &str) -> Result<Value, IpcError> {
        let payload = encode_command(&["get_property", name]);
        let mut stream = self.connect().await?;

        tokio::time::timeout(self.timeout, stream.write_all(payload.as_bytes()))
            .await
            .map_err(|_| IpcError::Timeout)?
            .map_err(|_| IpcError::NotConnected)?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        let read = tokio::time::timeout(self.timeout, reader.read_line(&mut line))
            .await
            .map_err(|_| IpcError::Timeout)?
            .map_err(|_| IpcError::NotConnected)?;
        if read == 0 {
            return Err(IpcError::Protocol("connection closed before reply".to_string()));
        }

        decode_reply(&line)
    }
}

fn encode_command(args: &[&str]) -> String {
    let mut payload = json!({ "command": args }).to_string();
    payload.push('\n');
    payload
}

fn decode_reply(line: &str) -> Result<Value, IpcError> {
    let reply: Value =
        serde_json::from_str(line.trim()).map_err(|e| IpcError::Protocol(e.to_string()))?;
    match reply.get("data") {
        Some(data) => Ok(data.clone()),
        None => {
            let error = reply
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("missing data field");
            Err(IpcError::Protocol(error.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_command_is_one_json_line() {
        let payload = encode_command(&["get_property", "volume"]);
        assert_eq!(payload, "{\"command\":[\"get_property\",\"volume\"]}\n");
    }

    #[test]
    fn test_decode_reply_extracts_data() {
        let data = decode_reply("{\"data\":50.0,\"error\":\"success\"}\n").unwrap();
        assert_eq!(data.as_f64(), Some(50.0));
    }

    #[test]
    fn test_decode_reply_keeps_booleans() {
        let data = decode_reply("{\"data\":true,\"error\":\"success\"}").unwrap();
        assert_eq!(data, Value::Bool(true));
    }

    #[test]
    fn test_decode_reply_error_variants() {
        assert!(matches!(
            decode_reply("not json at all"),
            Err(IpcError::Protocol(_))
        ));
        match decode_reply("{\"error\":\"property unavailable\"}") {
            Err(IpcError::Protocol(msg)) => assert_eq!(msg, "property unavailable"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_socket_is_not_connected() {
        let client = IpcClient::new("/nonexistent/mpvmenu-test-socket", Duration::from_millis(100));
        assert!(matches!(client.send("stop").await, Err(IpcError::NotConnected)));
        assert!(matches!(
            client.get_property("volume").await,
            Err(IpcError::NotConnected)
        ));
    }
}
