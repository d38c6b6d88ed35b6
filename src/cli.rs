//! CLI - Command Line Interface for jellytv
//!
//! Every read the TUI performs is scriptable. Output is JSON when asked
//! for (or when stdout is not a terminal).
//!
//! # Examples
//!
//! ```bash
//! # Public server info, no sign-in needed
//! jellytv info https://demo.jellyfin.org/stable
//!
//! # Sign in and list libraries
//! jellytv --server https://jf.local --user alice --password secret libraries
//!
//! # Grid geometry for a viewport width
//! jellytv layout --width 1920 --grid item
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::api::ErrorKind;
use crate::layout::GridKind;

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit status, stable for scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Sign-in missing or rejected
    AuthFailed = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

impl From<ErrorKind> for ExitCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotAuthenticated | ErrorKind::Auth => ExitCode::AuthFailed,
            ErrorKind::Transport => ExitCode::NetworkError,
        }
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// jellytv - Jellyfin client for the terminal and the TV
///
/// With no subcommand the TUI starts; subcommands print and exit.
#[derive(Parser, Debug)]
#[command(
    name = "jellytv",
    version,
    about = "Jellyfin client for the terminal, built for the couch",
    long_about = "Browse your Jellyfin libraries with a TV remote or a keyboard.\n\n\
                  With no subcommand the TUI starts. Subcommands query the\n\
                  server once and print the result.",
    after_help = "EXAMPLES:\n\
                  jellytv                                  Launch interactive TUI\n\
                  jellytv --tv                             Launch in TV mode\n\
                  jellytv info https://jf.local            Show public server info\n\
                  jellytv -u alice -p secret libraries     List libraries\n\
                  jellytv layout --width 1920 --grid item  Show grid geometry"
)]
pub struct Cli {
    /// Print JSON (implied when stdout is not a terminal)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Only print results and errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Run with TV focus behavior and navigation bar
    #[arg(long, global = true)]
    pub tv: bool,

    /// Jellyfin server URL (overrides config)
    #[arg(long, short = 's', global = true)]
    pub server: Option<String>,

    /// Username (overrides config)
    #[arg(long, short = 'u', global = true)]
    pub user: Option<String>,

    /// Password for CLI commands that sign in (or JELLYTV_PASSWORD)
    #[arg(long, short = 'p', global = true)]
    pub password: Option<String>,

    /// Subcommand; without one the TUI starts
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// A subcommand means one-shot CLI mode
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// JSON when asked for or when piped
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a server's public information
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Sign in and report the session
    Login(LoginCmd),

    /// List the signed-in user's libraries
    #[command(visible_alias = "libs")]
    Libraries(LibrariesCmd),

    /// List the items of a library
    Items(ItemsCmd),

    /// Compute tile layout for a viewport width
    Layout(LayoutCmd),
}

#[derive(Args, Debug)]
pub struct InfoCmd {
    /// Server URL (defaults to --server or the configured server)
    pub url: Option<String>,
}

#[derive(Args, Debug)]
pub struct LoginCmd {}

#[derive(Args, Debug)]
pub struct LibrariesCmd {}

#[derive(Args, Debug)]
pub struct ItemsCmd {
    /// Library (parent) id
    pub library_id: String,

    /// Maximum number of items to print
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct LayoutCmd {
    /// Viewport width in virtual pixels
    #[arg(long, short = 'w')]
    pub width: u32,

    /// Grid to lay out
    #[arg(long, short = 'g', value_enum, default_value_t = GridKind::Library)]
    pub grid: GridKind,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// `{data, error, exit_code}` envelope printed in JSON mode
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Success envelope
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Failure envelope
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Result of `login`
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub server_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Writes results as text or JSON, and errors to stderr
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print a result
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a line of human-readable text (JSON mode prints `data` instead)
    pub fn print_text<T: Serialize>(&self, text: &str, data: T) -> anyhow::Result<()> {
        if self.json {
            self.print(data)
        } else {
            println!("{}", text);
            Ok(())
        }
    }

    /// Report a failure and hand back its exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Progress note on stderr; silent with --quiet or --json
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
