//! # Extra Extra News
//!
//! A single-screen terminal client for The Guardian content API. It builds a
//! search request from your options, fetches one page of results, and lists
//! them with section, headline, byline and date. Pick a row number to open
//! the article in your browser.
//!
//! ## Usage
//!
//! ```sh
//! extra_extra_news --api-key YOUR_KEY -t cricket -o newest
//! ```
//!
//! ## Architecture
//!
//! 1. **Options**: CLI flags and env vars layered over `config.yaml`
//! 2. **Request**: the options become a query URL ([`request`])
//! 3. **Pipeline**: one GET, strict JSON parse into articles ([`pipeline`])
//! 4. **Screen**: connectivity check, background load, list rendering and
//!    row selection ([`screen`], [`presentation`])
//!
//! Every failure along the way is logged to stderr and shown to the user as
//! the same "No articles found." empty state.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod connectivity;
mod error;
mod models;
mod opener;
mod outputs;
mod pipeline;
mod presentation;
mod request;
mod screen;
mod utils;

use cli::Cli;
use config::{Settings, discover_preferences, resolve_settings};
use connectivity::{ConnectivityProbe, DEFAULT_PROBE_TIMEOUT, FixedProbe, TcpProbe};
use error::AppError;
use models::ArticleSnapshot;
use opener::BrowserOpener;
use outputs::{json, markdown};
use screen::ScreenController;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args.topic, ?args.order_by, once = args.once, "Parsed CLI arguments");

    let prefs = discover_preferences(args.config.as_deref())?;
    let settings = resolve_settings(&args, prefs);
    info!(
        topic = %settings.options.topic,
        order_by = %settings.options.order_by,
        page_size = settings.options.page_size,
        "extra_extra_news starting up"
    );

    // Fail early rather than after the fetch.
    for dir in [&args.json_output_dir, &args.markdown_output_dir].into_iter().flatten() {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "Output directory is not writable");
            return Err(e.into());
        }
    }

    let mut screen = build_screen(&args, settings)?;

    screen.load();
    show(&screen, &args)?;
    screen.wait().await;
    show(&screen, &args)?;
    info!(state = ?screen.state(), count = screen.list().len(), "Initial load finished");
    write_outputs(&screen, &args).await;

    if let Some(row) = args.open {
        if !screen.open(row) {
            warn!(row, "Could not open requested row");
        }
        return Ok(());
    }
    if args.once {
        return Ok(());
    }

    prompt_loop(&mut screen, &args).await?;
    info!("Goodbye");
    Ok(())
}

fn build_screen(args: &Cli, settings: Settings) -> Result<ScreenController, AppError> {
    let client = settings.http.build_client()?;

    let probe: Box<dyn ConnectivityProbe> = if args.no_probe {
        Box::new(FixedProbe(true))
    } else {
        match TcpProbe::for_endpoint(&settings.base_url, DEFAULT_PROBE_TIMEOUT) {
            Some(probe) => Box::new(probe),
            None => {
                // Let the pipeline report the bad URL instead of claiming we're offline.
                warn!(base_url = %settings.base_url, "Cannot probe endpoint; assuming online");
                Box::new(FixedProbe(true))
            }
        }
    };

    Ok(ScreenController::new(
        client,
        settings.base_url,
        settings.options,
        probe,
        Box::new(BrowserOpener),
    ))
}

/// Print the screen. Write errors (e.g. a closed pipe) end the run.
fn show(screen: &ScreenController, args: &Cli) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "\n{}", screen.render(args.width))?;
    stdout.flush()
}

#[instrument(level = "info", skip_all)]
async fn write_outputs(screen: &ScreenController, args: &Cli) {
    if args.json_output_dir.is_none() && args.markdown_output_dir.is_none() {
        return;
    }

    let snapshot = ArticleSnapshot {
        topic: screen.options().topic.clone(),
        order_by: screen.options().order_by.clone(),
        fetched_at: Local::now().to_rfc3339(),
        articles: screen.list().articles().to_vec(),
    };

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_snapshot(&snapshot, dir).await {
            error!(path = %dir, error = %e, "Failed to write JSON snapshot");
        }
    }
    if let Some(dir) = &args.markdown_output_dir {
        if let Err(e) = markdown::write_snapshot(&snapshot, dir).await {
            error!(path = %dir, error = %e, "Failed to write Markdown reading list");
        }
    }
}

/// Read commands from stdin until `q` or end of input.
///
/// A number opens that row, `r` reloads with the same options.
async fn prompt_loop(screen: &mut ScreenController, args: &Cli) -> Result<(), Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        {
            let mut stdout = std::io::stdout().lock();
            write!(stdout, "\n[row number] open  [r] reload  [q] quit > ")?;
            stdout.flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "" => continue,
            "q" | "quit" => break,
            "r" | "reload" => {
                screen.load();
                show(screen, args)?;
                screen.wait().await;
                show(screen, args)?;
                write_outputs(screen, args).await;
            }
            other => {
                let mut stdout = std::io::stdout();
                match other.parse::<usize>() {
                    Ok(row) if screen.open(row) => {
                        writeln!(stdout, "Opened row {row} in your browser.")?
                    }
                    Ok(row) => writeln!(stdout, "Nothing to open on row {row}.")?,
                    Err(_) => writeln!(stdout, "Unknown command: {other}")?,
                }
            }
        }
    }
    Ok(())
}
