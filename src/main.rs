//! authors-tui - A terminal admin table for author records
//!
//! This is the main entry point for the authors-tui application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::tui::Tui;
use anyhow::Result;
use clap::Parser;
use crossterm::event::Event;
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Browse, filter, sort and edit author records
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file holding the author records
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Rows per page
    #[arg(short, long)]
    page_size: Option<usize>,

    /// Delay before filter input is applied, in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,
}

impl Cli {
    /// Layer the flags over the loaded config
    fn apply(self, mut config: Config) -> Config {
        if let Some(data) = self.data {
            config.data_source = data.display().to_string();
        }
        if let Some(page_size) = self.page_size.filter(|s| *s > 0) {
            config.page_size = page_size;
        }
        if let Some(debounce_ms) = self.debounce_ms {
            config.filter_debounce_ms = debounce_ms;
        }
        config
    }
}

/// Open the log file under the config dir, or in the working directory
fn open_log_file() -> Option<File> {
    let log_file_path = match Config::config_dir() {
        Some(dir) => {
            fs::create_dir_all(&dir).ok();
            dir.join("authors-tui.log")
        }
        None => PathBuf::from("authors-tui.log"),
    };

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .map_err(|e| eprintln!("Warning: could not open log file {:?}: {}", log_file_path, e))
        .ok()
}

/// Logs go to a file so they never draw over the TUI.
/// Defaults to INFO, override with RUST_LOG.
fn init_logging() {
    let Some(log_file) = open_log_file() else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(log_file).with_ansi(false))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = cli.apply(Config::load());
    tracing::info!(
        data_source = %config.data_source,
        page_size = config.page_size,
        "starting authors-tui"
    );

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    // Create app state
    let mut app = App::new(&config);
    app.init()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    // Handle any errors
    if let Err(err) = result {
        tracing::error!("fatal: {:?}", err);
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    tracing::info!("exiting");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!("draw error: {}", e);
            }
        })?;

        // Poll for events
        if let Some(event) = tui.next_event()? {
            // Convert event to action
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                tracing::trace!(action = %a, "dispatch");
                current_action = app.update(a)?;
            }
        } else {
            // No event - send a tick for time-based updates
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "authors-tui",
            "--data",
            "/tmp/authors.json",
            "--page-size",
            "20",
            "--debounce-ms",
            "300",
        ]);
        let config = cli.apply(Config::default());
        assert_eq!(config.data_source, "/tmp/authors.json");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.filter_debounce_ms, 300);
    }

    #[test]
    fn test_cli_keeps_config_when_flags_absent() {
        let config = Cli::parse_from(["authors-tui", "--page-size", "0"]).apply(Config::default());
        assert_eq!(config, Config::default());
    }
}
