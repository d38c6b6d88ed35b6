//! mpv-backed playback handle
//!
//! Launches mpv with a JSON IPC socket and drives it with short,
//! synchronous request/response exchanges. mpv only answers property
//! queries, so the tracker polls it.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::process::{Child, Command};

use crate::models::PlaybackStatus;
use crate::playback::{PlaybackHandle, PlayerError};

/// How long a single IPC exchange may take before the player counts as busy
const IPC_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Debug, Deserialize)]
struct IpcReply {
    #[serde(default)]
    data: Value,
    error: String,
    #[serde(default)]
    request_id: Option<u64>,
}

/// An mpv child process plus its IPC connection
#[derive(Debug)]
pub struct MpvHandle {
    child: Child,
    socket_path: PathBuf,
    stream: Option<BufReader<UnixStream>>,
    next_request: u64,
    failed: bool,
    /// Last duration read from the player
    duration: Option<f64>,
}

impl MpvHandle {
    /// Start `command` (normally `mpv`) on `url`, paused until the user
    /// presses play.
    pub fn spawn(command: &str, url: &str) -> Result<Self, PlayerError> {
        let socket_path =
            std::env::temp_dir().join(format!("jellytv-mpv-{}.sock", uuid::Uuid::new_v4()));

        let mut cmd = Command::new(command);
        cmd.arg(url)
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .arg("--force-window=immediate")
            .arg("--pause")
            .arg("--keep-open=yes")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PlayerError::NotFound(command.to_string())
            } else {
                PlayerError::StartFailed(e)
            }
        })?;
        tracing::info!(command, socket = %socket_path.display(), "player started");

        Ok(Self {
            child,
            socket_path,
            stream: None,
            next_request: 1,
            failed: false,
            duration: None,
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    fn has_exited(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(Some(_)) | Err(_))
    }

    fn connection(&mut self) -> Result<&mut BufReader<UnixStream>, PlayerError> {
        if self.stream.is_none() {
            let stream = UnixStream::connect(&self.socket_path)
                .map_err(|e| PlayerError::Ipc(format!("connect: {}", e)))?;
            stream
                .set_read_timeout(Some(IPC_TIMEOUT))
                .and_then(|_| stream.set_write_timeout(Some(IPC_TIMEOUT)))
                .map_err(|e| PlayerError::Ipc(format!("socket options: {}", e)))?;
            self.stream = Some(BufReader::new(stream));
        }
        self.stream
            .as_mut()
            .ok_or_else(|| PlayerError::Ipc("not connected".into()))
    }

    /// Send one command and wait for the reply with the same request id
    fn command(&mut self, args: Value) -> Result<Value, PlayerError> {
        let request_id = self.next_request;
        self.next_request += 1;
        let mut line = json!({ "command": args, "request_id": request_id }).to_string();
        line.push('\n');

        let result = self.exchange(&line, request_id);
        if result.is_err() {
            // Reconnect on the next call
            self.stream = None;
        }
        result
    }

    fn exchange(&mut self, line: &str, request_id: u64) -> Result<Value, PlayerError> {
        let conn = self.connection()?;
        conn.get_mut()
            .write_all(line.as_bytes())
            .map_err(|e| PlayerError::Ipc(format!("write: {}", e)))?;

        let mut buf = String::new();
        loop {
            buf.clear();
            let read = conn
                .read_line(&mut buf)
                .map_err(|e| PlayerError::Ipc(format!("read: {}", e)))?;
            if read == 0 {
                return Err(PlayerError::Ipc("connection closed".into()));
            }
            // Event lines carry no request id
            let Ok(reply) = serde_json::from_str::<IpcReply>(&buf) else {
                continue;
            };
            if reply.request_id != Some(request_id) {
                continue;
            }
            return if reply.error == "success" {
                Ok(reply.data)
            } else {
                Err(PlayerError::Ipc(reply.error))
            };
        }
    }

    fn get_f64(&mut self, property: &str) -> Option<f64> {
        self.command(json!(["get_property", property]))
            .ok()
            .and_then(|v| v.as_f64())
    }
}

impl PlaybackHandle for MpvHandle {
    fn play(&mut self) -> Result<(), PlayerError> {
        self.command(json!(["set_property", "pause", false])).map(|_| ())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.command(json!(["set_property", "pause", true])).map(|_| ())
    }

    fn seek_by(&mut self, delta_seconds: f64) -> Result<(), PlayerError> {
        self.command(json!(["seek", delta_seconds, "relative"]))
            .map(|_| ())
    }

    fn set_position(&mut self, seconds: f64) -> Result<(), PlayerError> {
        self.command(json!(["seek", seconds, "absolute"])).map(|_| ())
    }

    fn current_time(&mut self) -> Option<f64> {
        self.get_f64("time-pos")
    }

    fn duration(&mut self) -> Option<f64> {
        self.duration = self.get_f64("duration");
        self.duration
    }

    fn is_playing(&mut self) -> bool {
        matches!(
            self.command(json!(["get_property", "pause"])),
            Ok(Value::Bool(false))
        )
    }

    fn status(&mut self) -> PlaybackStatus {
        if self.failed || self.has_exited() {
            self.failed = true;
            return PlaybackStatus::Error;
        }
        if self.connection().is_err() {
            return PlaybackStatus::Loading;
        }
        // Ready once a duration has been read; sampling asks for it first
        match self.duration {
            Some(_) => PlaybackStatus::ReadyToPlay,
            None => PlaybackStatus::Loading,
        }
    }
}

impl Drop for MpvHandle {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
        let _ = std::fs::remove_file(&self.socket_path);
    }
}
