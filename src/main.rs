use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use academy_escape::client::GameClient;
use academy_escape::draw::{self, InputEvent};
use academy_escape::networking::{self, Request};
use clap::Parser;

#[derive(Parser)]
#[command(about = "Terminal client for the Academy Escape adventure server")]
pub struct Args {
    #[arg(env = "ACADEMY_ESCAPE_SERVER", default_value = "http://localhost:8080")]
    server_addr: String,
    #[arg(long, default_value = "academy-escape.log")]
    log_file: PathBuf,
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Give up on a request after this many seconds.
    #[arg(long)]
    request_timeout: Option<u64>,
    /// Ask the server for each command's arguments instead of using the
    /// built-in lists.
    #[arg(long)]
    server_options: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // The terminal is in raw mode while we run, so logs go to a file.
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.log_file)?;
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(&args.log_level))
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();

    tracing::info!("academy-escape starting, server {}", args.server_addr);

    let client = GameClient::new(
        &args.server_addr,
        args.request_timeout.map(Duration::from_secs),
    )?;
    let server_conn = networking::ServerConnection::new(client);

    let mut drawer = draw::Drawer::new()?;
    let mut exit_result = None;
    'gameloop: loop {
        std::thread::sleep(Duration::from_millis(10));
        if server_conn.join_handle.is_finished() {
            exit_result = Some(server_conn.join_handle.join());
            break 'gameloop;
        }
        let state = server_conn.last_state.load();
        let actions = drawer.fetch_events(&state)?;
        for a in actions {
            if a == InputEvent::Quit {
                break 'gameloop;
            }
            let Some(request) = request_for(a, args.server_options) else {
                continue;
            };
            if let Err(e) = server_conn.send(request) {
                tracing::warn!("Network thread gone, dropping {:?}", e.0);
            }
        }
        let state = server_conn.last_state.load();
        drawer.draw(&state)?;
    }

    drop(drawer);

    // The worker only returns on its own when it panics; main keeps the sender alive.
    if let Some(Err(_)) = exit_result {
        eprintln!("Network thread panicked, see {}", args.log_file.display());
    }

    tracing::info!("academy-escape exiting");
    Ok(())
}

/// Map a UI event to the request the network thread should run. Command
/// changes only go to the server when server-driven options are on.
fn request_for(event: InputEvent, server_options: bool) -> Option<Request> {
    match event {
        InputEvent::Quit => None,
        InputEvent::Start => Some(Request::Start),
        InputEvent::Submit(turn) => Some(Request::Turn(turn)),
        InputEvent::CommandSelected(command) if server_options => {
            Some(Request::CommandOptions(command))
        }
        InputEvent::CommandSelected(_) => None,
    }
}

fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to INFO", level);
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_escape::protocol::TurnRequest;

    #[test]
    fn log_levels_parse_case_insensitively() {
        assert_eq!(parse_log_level("trace"), tracing::Level::TRACE);
        assert_eq!(parse_log_level("DEBUG"), tracing::Level::DEBUG);
        assert_eq!(parse_log_level("Info"), tracing::Level::INFO);
        assert_eq!(parse_log_level("warning"), tracing::Level::WARN);
        assert_eq!(parse_log_level("warn"), tracing::Level::WARN);
        assert_eq!(parse_log_level("error"), tracing::Level::ERROR);
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        assert_eq!(parse_log_level("verbose"), tracing::Level::INFO);
    }

    #[test]
    fn command_changes_reach_server_only_with_server_options() {
        let selected = InputEvent::CommandSelected("take".to_owned());
        assert_eq!(request_for(selected.clone(), false), None);
        assert_eq!(
            request_for(selected, true),
            Some(Request::CommandOptions("take".to_owned()))
        );
    }

    #[test]
    fn start_and_submit_always_map_to_requests() {
        let turn = TurnRequest::new("look", None);
        assert_eq!(request_for(InputEvent::Start, false), Some(Request::Start));
        assert_eq!(
            request_for(InputEvent::Submit(turn.clone()), false),
            Some(Request::Turn(turn))
        );
        assert_eq!(request_for(InputEvent::Quit, true), None);
    }
}
