//! ticklist-cli — terminal front end for the ticklist service.
//!
//! DESIGN
//! ======
//! One-shot commands go over REST; `watch` holds the websocket subscription
//! open and re-renders on every pushed snapshot. Every mutation shares the
//! same error boundary: attempt, print one message, exit nonzero. No retry.

mod theme;

use std::io::{self, BufRead, Write};
use std::time::Duration;

use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use serde_json::Value;
use ticklist::frame::{Frame, Status};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use theme::{Mode, Palette};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("server returned error for {operation}: {message}")]
    ServerError { operation: String, message: String },
    #[error("todo text must not be empty")]
    EmptyText,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("could not read confirmation: {0}")]
    Prompt(#[from] io::Error),
}

// =============================================================================
// COMMAND LINE
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "ticklist", about = "ticklist todo service CLI")]
struct Cli {
    #[arg(long, env = "TICKLIST_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the server is reachable.
    Ping,
    /// Print the collection, newest first.
    List,
    /// Add a new todo.
    Add { text: String },
    /// Flip a todo's completion flag.
    Toggle { id: Uuid },
    /// Replace a todo's text.
    Edit { id: Uuid, text: String },
    /// Delete a todo (asks for confirmation).
    Rm {
        id: Uuid,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Delete every todo (asks for confirmation).
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Subscribe to live updates and re-render on every change.
    Watch,
    /// Show or flip the persisted dark-mode preference.
    Theme {
        #[arg(long)]
        toggle: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let base_url = cli.base_url.clone();

    // Theme initializes from the prefs file, defaulting to light.
    let prefs_path = theme::default_prefs_path();
    let mode = theme::read_preference(&prefs_path);

    let result = match cli.command {
        Command::Ping => run_ping(&base_url).await,
        Command::List => run_list(&base_url, mode).await,
        Command::Add { text } => run_add(&base_url, &text).await,
        Command::Toggle { id } => run_toggle(&base_url, id).await,
        Command::Edit { id, text } => run_edit(&base_url, id, &text).await,
        Command::Rm { id, yes } => run_rm(&base_url, id, yes).await,
        Command::Clear { yes } => run_clear(&base_url, yes).await,
        Command::Watch => run_watch(&base_url, mode).await,
        Command::Theme { toggle } => run_theme(&prefs_path, mode, toggle),
    };

    // The single recovery boundary: one message, nonzero exit, no retry.
    if let Err(e) = result {
        eprintln!("ticklist: {e}");
        std::process::exit(1);
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let url = format!("{}/healthz", base_url.trim_end_matches('/'));
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError {
            operation: format!("HTTP {}", status.as_u16()),
            message: "health check failed".to_owned(),
        });
    }
    println!("ok");
    Ok(())
}

async fn run_list(base_url: &str, mode: Mode) -> Result<(), CliError> {
    let json = api_request(base_url, reqwest::Method::GET, "/api/todos", None).await?;
    render_list(&json, mode.palette());
    Ok(())
}

async fn run_add(base_url: &str, text: &str) -> Result<(), CliError> {
    // Client-side guard: never send blank text, even though the service
    // would reject it too.
    let text = text.trim();
    if text.is_empty() {
        return Err(CliError::EmptyText);
    }

    let json = api_request(
        base_url,
        reqwest::Method::POST,
        "/api/todos",
        Some(serde_json::json!({ "text": text })),
    )
    .await?;
    let id = json.get("id").and_then(Value::as_str).unwrap_or("?");
    println!("added {id}");
    Ok(())
}

async fn run_toggle(base_url: &str, id: Uuid) -> Result<(), CliError> {
    let path = format!("/api/todos/{id}/toggle");
    let json = api_request(base_url, reqwest::Method::POST, &path, None).await?;
    let done = json.get("is_completed").and_then(Value::as_bool).unwrap_or(false);
    println!("{id} is now {}", if done { "done" } else { "open" });
    Ok(())
}

async fn run_edit(base_url: &str, id: Uuid, text: &str) -> Result<(), CliError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CliError::EmptyText);
    }

    let path = format!("/api/todos/{id}");
    api_request(
        base_url,
        reqwest::Method::PATCH,
        &path,
        Some(serde_json::json!({ "text": text })),
    )
    .await?;
    println!("updated {id}");
    Ok(())
}

async fn run_rm(base_url: &str, id: Uuid, yes: bool) -> Result<(), CliError> {
    if !yes && !confirm(&format!("delete todo {id}?"))? {
        println!("aborted");
        return Ok(());
    }

    let path = format!("/api/todos/{id}");
    let json = api_request(base_url, reqwest::Method::DELETE, &path, None).await?;
    let existed = json.get("deleted").and_then(Value::as_bool).unwrap_or(false);
    println!("{}", if existed { "deleted" } else { "nothing to delete" });
    Ok(())
}

async fn run_clear(base_url: &str, yes: bool) -> Result<(), CliError> {
    if !yes && !confirm("delete ALL todos?")? {
        println!("aborted");
        return Ok(());
    }

    let json = api_request(base_url, reqwest::Method::DELETE, "/api/todos", None).await?;
    let count = json.get("deleted_count").and_then(Value::as_u64).unwrap_or(0);
    println!("deleted {count} todos");
    Ok(())
}

fn run_theme(prefs_path: &std::path::Path, mode: Mode, do_toggle: bool) -> Result<(), CliError> {
    let mode = if do_toggle { theme::toggle(prefs_path, mode) } else { mode };
    let palette = mode.palette();
    println!(
        "{} mode ({})",
        if mode.is_dark() { "dark" } else { "light" },
        theme::paint(palette.primary, palette.primary),
    );
    Ok(())
}

// =============================================================================
// WATCH
// =============================================================================

async fn run_watch(base_url: &str, mode: Mode) -> Result<(), CliError> {
    let url = ws_url(base_url)?;
    let (mut stream, _) = connect_async(url)
        .await
        .map_err(|error| CliError::WsConnect(Box::new(error)))?;

    eprintln!("watching for changes (ctrl-c to stop)");

    // The subscription lives exactly as long as this loop; dropping the
    // stream is the teardown.
    loop {
        let Some(message) = stream.next().await else {
            return Err(CliError::WsClosed);
        };
        match message.map_err(|error| CliError::WsConnect(Box::new(error)))? {
            Message::Text(text) => {
                let frame: Frame = match serde_json::from_str(&text) {
                    Ok(f) => f,
                    Err(e) => {
                        eprintln!("ticklist: skipping malformed frame: {e}");
                        continue;
                    }
                };
                if frame.status == Status::Item && frame.syscall == "todo:list" {
                    if let Some(todos) = frame.data.get("todos") {
                        render_list(todos, mode.palette());
                        println!();
                    }
                }
            }
            Message::Close(_) => return Err(CliError::WsClosed),
            _ => {}
        }
    }
}

fn ws_url(base_url: &str) -> Result<String, CliError> {
    let base_url = base_url.trim_end_matches('/');
    if let Some(rest) = base_url.strip_prefix("http://") {
        return Ok(format!("ws://{rest}/api/ws"));
    }
    if let Some(rest) = base_url.strip_prefix("https://") {
        return Ok(format!("wss://{rest}/api/ws"));
    }
    Err(CliError::InvalidBaseUrl(base_url.to_owned()))
}

// =============================================================================
// HTTP
// =============================================================================

async fn api_request(
    base_url: &str,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()?;
    let url = format!("{}{}", base_url.trim_end_matches('/'), path);

    let request = client.request(method.clone(), &url);
    let request = if let Some(json) = body { request.json(&json) } else { request };

    let response = request.send().await?;
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or(Value::Null);

    if !status.is_success() {
        return Err(CliError::ServerError {
            operation: format!("{method} {path} (HTTP {})", status.as_u16()),
            message: value.to_string(),
        });
    }

    Ok(value)
}

// =============================================================================
// RENDERING
// =============================================================================

fn render_list(todos: &Value, palette: &Palette) {
    let Some(items) = todos.as_array() else {
        println!("{}", theme::paint(palette.warning, "unexpected response shape"));
        return;
    };

    if items.is_empty() {
        println!("{}", theme::paint(palette.text_muted, "nothing to do"));
        return;
    }

    for item in items {
        let id = item.get("id").and_then(Value::as_str).unwrap_or("?");
        let text = item.get("text").and_then(Value::as_str).unwrap_or("");
        let done = item.get("is_completed").and_then(Value::as_bool).unwrap_or(false);

        let (mark, color) = if done { ("[x]", palette.success) } else { ("[ ]", palette.text) };
        println!(
            "{} {}  {}",
            theme::paint(color, mark),
            theme::paint(color, text),
            theme::paint(palette.text_muted, id),
        );
    }
}

fn confirm(question: &str) -> Result<bool, CliError> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
