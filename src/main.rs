use std::io::Write;

use chatline::app::App;
use chatline::cli::{parse_args, run_cli_command, RunOptions, VERSION};
use chatline::config::ClientConfig;
use chatline::console::{render_while, ConsoleRenderer};
use chatline::debug::{create_debug_channel, DebugEvent};
use chatline::error::SubmitError;
use chatline::turn::TurnOutcome;

use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEBUG_CHANNEL_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let command = parse_args(std::env::args())?;
    let Some(options) = run_cli_command(command) else {
        return Ok(());
    };

    init_tracing();
    run(options).await
}

/// Initialize tracing on stderr so stdout carries only the conversation
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chatline=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(options: RunOptions) -> Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = options.base_url {
        config = config.with_base_url(url);
    }

    let mut app = App::from_config(config).await?;
    if options.debug_events {
        let (debug_tx, debug_rx) = create_debug_channel(DEBUG_CHANNEL_CAPACITY);
        tokio::spawn(print_debug_events(debug_rx));
        app = app.with_debug(debug_tx);
    }
    if options.new_conversation {
        app.new_conversation().await;
    }

    let mut rx = app.subscribe();
    let mut renderer = ConsoleRenderer::new(std::io::stdout());
    let initial = rx.borrow_and_update().clone();
    renderer.render(&initial)?;

    eprintln!(
        "chatline {} - conversation {} (/new to start over, /quit to exit)",
        VERSION,
        app.conversation_id()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        match input {
            "/quit" | "/exit" => break,
            "/new" => {
                render_while(app.new_conversation(), &mut rx, &mut renderer).await?;
                continue;
            }
            _ => {}
        }

        match render_while(app.submit(input), &mut rx, &mut renderer).await? {
            Ok(report) => {
                if let TurnOutcome::Failed(e) = &report.outcome {
                    tracing::debug!("Turn failed [{}]: {}", e.error_code(), e);
                }
            }
            Err(SubmitError::EmptyInput) => {}
            Err(e) => eprintln!("{}", e.user_message()),
        }
    }

    Ok(())
}

async fn print_debug_events(mut rx: broadcast::Receiver<DebugEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => eprintln!("{}", json),
                Err(e) => tracing::warn!("Could not encode debug event: {}", e),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Debug output skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
