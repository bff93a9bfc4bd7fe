#![deny(unsafe_code)]

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use xwindowtools::common::constants::{config, wait};
use xwindowtools::{ToolConfig, WindowHandle, logging, ops};

#[derive(Parser)]
#[command(name = "xwt")]
#[command(version)]
#[command(about = "Find, inspect and focus X11 windows", long_about = None)]
struct Cli {
    /// X display to connect to (defaults to the config file, then $DISPLAY)
    #[arg(long, global = true)]
    display: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the first window whose title contains TERM (case-insensitive)
    Search {
        term: String,

        /// Print every matching window
        #[arg(long)]
        all: bool,
    },

    /// Print the currently focused window
    Focus,

    /// Focus and raise a window (decimal or 0x-prefixed hex id)
    Activate { handle: WindowHandle },

    /// List all top-level windows with their titles
    List {
        /// Emit JSON instead of tab-separated lines
        #[arg(long)]
        json: bool,
    },

    /// Wait until a window whose title contains TERM appears
    Wait {
        term: String,

        #[arg(long, default_value_t = wait::TIMEOUT_MS)]
        timeout_ms: u64,

        #[arg(long, default_value_t = wait::INTERVAL_MS, value_parser = parse_interval_ms)]
        interval_ms: u64,
    },
}

fn parse_interval_ms(s: &str) -> Result<u64, String> {
    let ms: u64 = s.parse().map_err(|e| format!("{}", e))?;
    if ms < wait::MIN_INTERVAL_MS {
        return Err(format!("must be at least {} ms", wait::MIN_INTERVAL_MS));
    }
    Ok(ms)
}

fn found(handle: Option<WindowHandle>) -> ExitCode {
    match handle {
        Some(handle) => {
            println!("{}", handle);
            ExitCode::SUCCESS
        }
        None => ExitCode::FAILURE,
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { config::LOG_LEVEL };
    let log = logging::init(default_filter)?;

    let config = ToolConfig::load()?.with_display(cli.display);
    if !cli.verbose {
        log.set_filter(&config.log_level)?;
    }

    let code = match cli.command {
        Command::Search { term, all: false } => found(ops::window_search(&config, &term)?),
        Command::Search { term, all: true } => {
            let handles = ops::window_search_all(&config, &term)?;
            for handle in &handles {
                println!("{}", handle);
            }
            if handles.is_empty() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Command::Focus => found(ops::get_window_focus(&config)?),
        Command::Activate { handle } => {
            ops::set_window_focus(&config, handle)?;
            ExitCode::SUCCESS
        }
        Command::List { json } => {
            let windows = ops::list_windows(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&windows)?);
            } else {
                for window in windows {
                    println!("{}\t{}", window.handle, window.title.unwrap_or_default());
                }
            }
            ExitCode::SUCCESS
        }
        Command::Wait {
            term,
            timeout_ms,
            interval_ms,
        } => found(ops::wait_for_window(
            &config,
            &term,
            Duration::from_millis(interval_ms),
            Duration::from_millis(timeout_ms),
        )?),
    };

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_below_minimum_is_rejected() {
        assert!(parse_interval_ms("0").is_err());
        assert!(parse_interval_ms("soon").is_err());
        assert_eq!(parse_interval_ms("250"), Ok(250));
    }

    #[test]
    fn test_wait_rejects_zero_interval() {
        let parsed = Cli::try_parse_from(["xwt", "wait", "firefox", "--interval-ms", "0"]);
        assert!(parsed.is_err());
        let parsed = Cli::try_parse_from(["xwt", "wait", "firefox"]);
        assert!(parsed.is_ok());
    }
}
