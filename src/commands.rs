//! CLI Command Handlers
//!
//! Implements all CLI commands on top of the media client.
//! Each handler takes CLI args and Output, returns ExitCode.

use std::path::PathBuf;

use crate::api::{ApiError, ClientInfo, MediaClient, Session};
use crate::cli::{
    Cli, Command, ExitCode, InfoCmd, ItemsCmd, LayoutCmd, LibrariesCmd, LoginCmd, LoginResponse,
    Output,
};
use crate::config::Config;
use crate::layout::layout_for;
use crate::models::LibraryItem;

/// Environment variable consulted when `--password` is absent
pub const PASSWORD_ENV: &str = "JELLYTV_PASSWORD";

/// Resolved connection settings: CLI flags over config over defaults
#[derive(Debug, Clone)]
pub struct Connection {
    pub server_url: String,
    pub username: String,
    pub password: Option<String>,
}

impl Connection {
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        Self {
            server_url: cli
                .server
                .clone()
                .unwrap_or_else(|| config.server_url().to_string()),
            username: cli
                .user
                .clone()
                .unwrap_or_else(|| config.username().to_string()),
            password: cli
                .password
                .clone()
                .or_else(|| std::env::var(PASSWORD_ENV).ok()),
        }
    }
}

/// Load config from `--config` or the default location
pub fn load_config(path: Option<&PathBuf>) -> Config {
    match path {
        Some(p) => Config::load_from(p),
        None => Config::load(),
    }
}

/// Build a media client identified by the configured device id
pub fn client_for(config: &mut Config, config_path: Option<&PathBuf>) -> MediaClient {
    let device_id = config.device_id(config_path.map(PathBuf::as_path));
    MediaClient::with_timeout(ClientInfo::new(device_id), config.request_timeout())
}

fn api_failure(output: &Output, context: &str, error: &ApiError) -> ExitCode {
    output.error(format!("{}: {}", context, error), error.kind().into())
}

/// Run a CLI command and return its exit code
pub async fn run(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let mut config = load_config(cli.config.as_ref());
    let connection = Connection::resolve(&cli, &config);

    let Some(command) = cli.command else {
        return ExitCode::Success;
    };

    // Layout is pure; no client needed
    if let Command::Layout(cmd) = command {
        return layout_cmd(cmd, &output);
    }

    let client = client_for(&mut config, cli.config.as_ref());
    match command {
        Command::Info(cmd) => info_cmd(cmd, &client, &connection, &output).await,
        Command::Login(cmd) => login_cmd(cmd, &client, &connection, &output).await,
        Command::Libraries(cmd) => libraries_cmd(cmd, &client, &connection, &output).await,
        Command::Items(cmd) => items_cmd(cmd, &client, &connection, &output).await,
        Command::Layout(_) => ExitCode::Success,
    }
}

// =============================================================================
// Info Command
// =============================================================================

pub async fn info_cmd(
    cmd: InfoCmd,
    client: &MediaClient,
    connection: &Connection,
    output: &Output,
) -> ExitCode {
    let url = cmd.url.as_deref().unwrap_or(&connection.server_url);
    output.info(format!("Querying {}", url));

    match client.public_system_info(url).await {
        Ok(info) => {
            let text = format!(
                "{} (Jellyfin {})",
                info.server_name.as_deref().unwrap_or("unnamed server"),
                info.version.as_deref().unwrap_or("unknown version")
            );
            if let Err(e) = output.print_text(&text, &info) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(ApiError::InvalidUrl(url)) => {
            output.error(format!("Invalid server URL: {}", url), ExitCode::InvalidArgs)
        }
        Err(e) => api_failure(output, "Server info failed", &e),
    }
}

// =============================================================================
// Sign-in helpers
// =============================================================================

async fn sign_in(
    client: &MediaClient,
    connection: &Connection,
    output: &Output,
) -> Result<Session, ExitCode> {
    let Some(password) = connection.password.as_deref() else {
        return Err(output.error(
            format!("Password required (--password or {})", PASSWORD_ENV),
            ExitCode::InvalidArgs,
        ));
    };
    output.info(format!(
        "Signing in to {} as {}",
        connection.server_url, connection.username
    ));
    client
        .authenticate(&connection.server_url, &connection.username, password)
        .await
        .map_err(|e| api_failure(output, "Sign in failed", &e))
}

fn print_items(items: &[LibraryItem], output: &Output) -> ExitCode {
    let text = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "{:<34} {}",
                item.key(i),
                item.display_name("(unnamed)")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    if let Err(e) = output.print_text(&text, items) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Login Command
// =============================================================================

pub async fn login_cmd(
    _cmd: LoginCmd,
    client: &MediaClient,
    connection: &Connection,
    output: &Output,
) -> ExitCode {
    let session = match sign_in(client, connection, output).await {
        Ok(session) => session,
        Err(code) => return code,
    };
    let response = LoginResponse {
        status: "ok",
        server_url: session.server_url().to_string(),
        user_id: session.user_id().map(str::to_string),
        user_name: session.user_name().map(str::to_string),
    };
    let text = format!(
        "Signed in to {} as {}",
        response.server_url,
        response.user_name.as_deref().unwrap_or(&connection.username)
    );
    client.logout().await;
    if let Err(e) = output.print_text(&text, &response) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Libraries Command
// =============================================================================

pub async fn libraries_cmd(
    _cmd: LibrariesCmd,
    client: &MediaClient,
    connection: &Connection,
    output: &Output,
) -> ExitCode {
    if let Err(code) = sign_in(client, connection, output).await {
        return code;
    }
    let result = client.list_libraries().await;
    client.logout().await;
    match result {
        Ok(libraries) => print_items(&libraries, output),
        Err(e) => api_failure(output, "Failed to load libraries", &e),
    }
}

// =============================================================================
// Items Command
// =============================================================================

pub async fn items_cmd(
    cmd: ItemsCmd,
    client: &MediaClient,
    connection: &Connection,
    output: &Output,
) -> ExitCode {
    if cmd.library_id.trim().is_empty() {
        return output.error("Library id must not be empty", ExitCode::InvalidArgs);
    }
    if let Err(code) = sign_in(client, connection, output).await {
        return code;
    }
    let result = client.list_items(cmd.library_id.trim()).await;
    client.logout().await;
    match result {
        Ok(mut items) => {
            if let Some(limit) = cmd.limit {
                items.truncate(limit);
            }
            print_items(&items, output)
        }
        Err(e) => api_failure(output, "Failed to load library items", &e),
    }
}

// =============================================================================
// Layout Command
// =============================================================================

pub fn layout_cmd(cmd: LayoutCmd, output: &Output) -> ExitCode {
    let layout = layout_for(cmd.width, cmd.grid);
    let text = format!(
        "{} grid at {}px: {} columns, {}x{}px tiles, {}px gap",
        cmd.grid,
        cmd.width,
        layout.column_count,
        layout.tile_size_px,
        layout.tile_height_px(),
        layout.gap_px
    );
    if let Err(e) = output.print_text(&text, layout) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}
