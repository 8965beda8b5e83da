//! Interactive shell and entry point.
//!
//! A thin layer over the library: it builds the configuration, wires the
//! HTTP client, session file and runtime together, then reads commands from
//! stdin while API replies arrive in the background.
//!
//! # Lifecycle
//!
//! 1. **Configure**: [`CliArgs`] layers flags, `BINDERBUILDER_*` variables and `config.toml`
//! 2. **Trace**: install the file-exporting subscriber
//! 3. **Start**: load the persisted session and verify it with the backend
//! 4. **Loop**: `select!` over stdin lines and API replies, redrawing as needed
//!
//! Run with `--help` for the flag list.

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use binderbuilder::api::{ApiWorker, HttpCardApi};
use binderbuilder::shell::{Command, HELP};
use binderbuilder::storage::{JsonStorage, MemoryStorage, SessionStorage};
use binderbuilder::ui::{render, render_notice};
use binderbuilder::{BinderError, CliArgs, Runtime};

/// Terminal width used for layout.
const COLUMNS: usize = 80;

fn draw(runtime: &mut Runtime, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out)?;
    render(runtime.state(), COLUMNS, out)?;

    let theme = runtime.state().theme.clone();
    for notice in runtime.drain_notices() {
        render_notice(&notice, &theme, out)?;
    }
    write!(out, "> ")?;
    out.flush()
}

fn redraw(runtime: &mut Runtime) {
    if let Err(e) = draw(runtime, &mut std::io::stdout().lock()) {
        tracing::warn!(error = %e, "failed to write to stdout");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), BinderError> {
    let args = CliArgs::parse();
    let config = args.load_config()?;
    binderbuilder::observability::init_tracing(&config);

    let span = tracing::debug_span!("shell_start");
    let guard = span.enter();

    tracing::debug!(api = %config.api_base_url, data_dir = %config.data_dir.display(), "configuration loaded");

    let client = HttpCardApi::new(&config.api_base_url, config.request_timeout())?;
    let worker = ApiWorker::new(Arc::new(client));

    let storage: Box<dyn SessionStorage> = if args.ephemeral {
        Box::new(MemoryStorage::new())
    } else {
        Box::new(JsonStorage::new(config.session_file())?)
    };

    let mut runtime = Runtime::new(binderbuilder::initialize(&config), storage, worker);
    runtime.start();
    drop(guard);

    println!("BinderBuilder {} (type `help` for commands)", env!("CARGO_PKG_VERSION"));
    redraw(&mut runtime);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to read stdin");
                        break;
                    }
                };

                let command = match Command::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => {
                        redraw(&mut runtime);
                        continue;
                    }
                    Err(usage) => {
                        println!("{usage}");
                        print!("> ");
                        let _ = std::io::stdout().flush();
                        continue;
                    }
                };

                tracing::debug!(command = ?command, "command received");

                match command {
                    Command::Quit => break,
                    Command::Help => {
                        println!("{HELP}");
                        print!("> ");
                        let _ = std::io::stdout().flush();
                    }
                    command => match command.into_events(runtime.state()) {
                        Ok(events) => {
                            for event in events {
                                runtime.dispatch(event);
                            }
                            redraw(&mut runtime);
                        }
                        Err(message) => {
                            println!("{message}");
                            print!("> ");
                            let _ = std::io::stdout().flush();
                        }
                    },
                }
            }

            Some(event) = runtime.next_reply(), if runtime.in_flight() > 0 => {
                if runtime.dispatch(event) {
                    redraw(&mut runtime);
                }
            }
        }
    }

    tracing::debug!(in_flight = runtime.in_flight(), "shell exiting");
    Ok(())
}
