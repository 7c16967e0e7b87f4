//! Interactive control panel for the Merlinfest visual-state hub.
//!
//! Connects with the sync agent, prints hub events as they arrive and turns
//! typed commands into intents. Reconnects on its own, falling back to the
//! alternate transport path; exits with status 1 once every profile is
//! exhausted.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin merlinfest-client
//! cargo run --bin merlinfest-client -- --url ws://festival.local:8080/ws --max-attempts 3
//! ```

use std::time::Duration;

use clap::Parser;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use merlinfest_client::{
    ClientConfig, RetryPolicy, SyncClient, SyncEventKind,
    control::{ControlCommand, HELP, parse_command},
    formatter::MessageFormatter,
    ui::{PROMPT, redisplay_prompt},
};
use merlinfest_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "merlinfest-client")]
#[command(about = "Control panel for the Merlinfest visual-state hub", long_about = None)]
struct Args {
    /// Primary WebSocket URL of the hub
    #[arg(short = 'u', long, env = "MERLINFEST_URL", default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Fallback WebSocket URLs, tried in order after the primary
    /// [default: the primary's host at /api/socket/io]
    #[arg(long = "fallback-url", env = "MERLINFEST_FALLBACK_URL", value_delimiter = ',')]
    fallback_urls: Vec<String>,

    /// Connection attempts per URL
    #[arg(long, default_value_t = 5)]
    max_attempts: u32,

    /// Delay before the first retry, doubled on every further retry
    #[arg(long, default_value_t = 1000)]
    retry_delay_ms: u64,

    /// Upper bound for the retry delay
    #[arg(long, default_value_t = 8000)]
    max_retry_delay_ms: u64,
}

enum Input {
    Line(String),
    Closed,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let retry = RetryPolicy {
        max_attempts: args.max_attempts,
        initial_delay: Duration::from_millis(args.retry_delay_ms),
        max_delay: Duration::from_millis(args.max_retry_delay_ms),
    };
    let config = if args.fallback_urls.is_empty() {
        ClientConfig::with_derived_fallback(args.url, retry)
    } else {
        ClientConfig::from_urls(std::iter::once(args.url).chain(args.fallback_urls), retry)
    };
    let client = SyncClient::new(config);

    let mut subscriptions = Vec::new();
    for kind in [
        SyncEventKind::Connect,
        SyncEventKind::Disconnect,
        SyncEventKind::ConnectError,
        SyncEventKind::InitialState,
        SyncEventKind::VisualUpdate,
        SyncEventKind::UserCountUpdate,
        SyncEventKind::ThemeChanged,
        SyncEventKind::EffectTriggered,
    ] {
        subscriptions.push(client.on(kind, |event| {
            print!("{}", MessageFormatter::format_event(event));
            redisplay_prompt();
        }));
    }

    let (gave_up_tx, mut gave_up_rx) = mpsc::unbounded_channel::<()>();
    subscriptions.push(client.on(SyncEventKind::GaveUp, move |event| {
        print!("{}", MessageFormatter::format_event(event));
        let _ = gave_up_tx.send(());
    }));

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<Input>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                let _ = input_tx.send(Input::Closed);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let _ = rl.add_history_entry(line.as_str());
                    if input_tx.send(Input::Line(line)).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    let _ = input_tx.send(Input::Closed);
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    let _ = input_tx.send(Input::Closed);
                    break;
                }
            }
        }
    });

    client.connect();

    let exit_code = loop {
        tokio::select! {
            _ = gave_up_rx.recv() => break 1,
            input = input_rx.recv() => match input {
                Some(Input::Line(line)) => match parse_command(&line) {
                    Ok(Some(ControlCommand::Quit)) => break 0,
                    Ok(Some(command)) => run_command(&client, command),
                    Ok(None) => {}
                    Err(e) => println!("{}", e),
                },
                Some(Input::Closed) | None => break 0,
            },
        }
    };

    client.disconnect();
    for subscription in subscriptions {
        subscription.unsubscribe();
    }
    std::process::exit(exit_code);
}

fn run_command(client: &SyncClient, command: ControlCommand) {
    let sent = match command {
        ControlCommand::ChangeTheme(theme) => client.change_theme(theme),
        ControlCommand::TriggerEffect(effect_id) => client.trigger_effect(effect_id),
        ControlCommand::UpdateVisuals(patch) => client.update_visuals(patch),
        ControlCommand::ShowState => {
            print!(
                "{}",
                MessageFormatter::format_visual_state("Local visuals", &client.visual_state())
            );
            true
        }
        ControlCommand::Help => {
            print!("{}", HELP);
            true
        }
        ControlCommand::Quit => true,
    };
    if !sent {
        println!("Not connected to the hub ({:?})", client.connection_state());
    }
}
