mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod theme;
mod trace;
mod widgets;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use spindle_core::catalog::{Catalog, Side};
use spindle_core::config::Config;

#[derive(Debug, Parser)]
#[command(name = "spindle", version, about = "Scroll-driven vinyl player for the terminal")]
struct Cli {
    /// Config file (default: ~/.config/spindle/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Track catalog TOML; overrides `[catalog] path` from the config
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sweep scroll progress headlessly and print one JSON line per sample
    Trace {
        #[arg(long, default_value_t = 0.0)]
        from: f64,
        #[arg(long, default_value_t = 1.0)]
        to: f64,
        #[arg(long, default_value_t = 101)]
        steps: usize,
        /// Report frames mid-scroll instead of settled
        #[arg(long)]
        live: bool,
    },
    /// Print the effective track catalog
    Catalog,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = spindle_core::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("spindle.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // ── Load config ──────────────────────────────────────────────────────────
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Config::load().unwrap_or_default(),
    };

    // ── Load catalog ─────────────────────────────────────────────────────────
    let catalog_path = cli.catalog.clone().or_else(|| config.catalog.path.clone());
    let catalog = Catalog::load_or_builtin(catalog_path.as_deref());

    match cli.command {
        Some(Command::Trace {
            from,
            to,
            steps,
            live,
        }) => {
            let titles: Vec<String> = catalog.tracks().iter().map(|t| t.title.clone()).collect();
            let rows = trace::sweep(
                &config,
                &titles,
                trace::Sweep {
                    from,
                    to,
                    steps,
                    live,
                },
            );
            tracing::info!("trace: {} samples {:.3}..{:.3}", rows.len(), from, to);
            trace::write_rows(&rows, std::io::stdout().lock())?;
        }
        Some(Command::Catalog) => {
            for side in [Side::A, Side::B] {
                println!("{}", side.label());
                for (i, track) in catalog.side(side) {
                    println!(
                        "  {:02}  {:<28} {:<20} {:>8}  {}",
                        i + 1,
                        track.title,
                        track.artist,
                        track.duration,
                        track.video
                    );
                }
            }
        }
        None => {
            // Print log path to stderr so the operator can tail it immediately.
            eprintln!("spindle log: {}", log_path.display());
            tracing::info!("spindle starting, {} tracks", catalog.len());
            app::App::new(&config, catalog).run().await?;
        }
    }

    Ok(())
}
