//! sb - signal-driven status bar for dwm
//!
//! CLI entry point for running and controlling the status bar.

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result, eyre};
use tracing::{debug, info, warn};

use statusbar::cli::{Cli, Command, generate_after_help, get_log_path, wants_help};
use statusbar::config::{Config, ConfigError};
use statusbar::daemon::{DaemonManager, VERSION};
use statusbar::domain::{BarLayout, ProducerSpec, RefreshMode, TriggerId};
use statusbar::publish::create_publisher;
use statusbar::trigger::spawn_signal_listeners;
use statusbar::{StatusBar, render_once};

/// Exit code for a trigger id outside 0-30
const EXIT_INVALID_TRIGGER: i32 = 3;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    // Append: `sb trigger` and friends share the running daemon's log
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

/// Load and validate the configuration, exiting with its code on failure
fn load_layout(config_path: Option<&PathBuf>) -> (Config, BarLayout) {
    debug!(?config_path, "load_layout: called");
    let result = Config::load(config_path).and_then(|config| {
        let layout = config.layout()?;
        Ok((config, layout))
    });

    match result {
        Ok(loaded) => loaded,
        Err(e) => exit_with_config_error(&e),
    }
}

fn exit_with_config_error(e: &ConfigError) -> ! {
    warn!(error = %e, code = e.exit_code(), "Invalid configuration");
    eprintln!("ERROR: {}", e);
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> Result<()> {
    // The after_help probes external tools, so only build it when help is shown
    let mut cmd = Cli::command();
    if wants_help(std::env::args()) {
        cmd = cmd.after_help(generate_after_help());
    }
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    info!(version = VERSION, "sb starting");
    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let (config, layout) = load_layout(cli.config.as_ref());
            cmd_run(&config, &layout).await
        }
        Command::Once => {
            let (_, layout) = load_layout(cli.config.as_ref());
            cmd_once(&layout).await
        }
        Command::Check => {
            let (_, layout) = load_layout(cli.config.as_ref());
            cmd_check(&layout)
        }
        Command::Trigger { id } => cmd_trigger(id),
        Command::Stop => cmd_stop(),
        Command::Status => cmd_status(),
    }
}

/// Run the status bar until SIGINT or SIGTERM
async fn cmd_run(config: &Config, layout: &BarLayout) -> Result<()> {
    debug!("cmd_run: called");
    let daemon = DaemonManager::new();
    if let Some(pid) = daemon.running_pid()
        && pid != std::process::id()
    {
        println!("Status bar already running (PID: {})", pid);
        return Ok(());
    }
    daemon.register_self()?;

    let publisher = create_publisher(config.publisher);
    let bar = StatusBar::start(layout, publisher)?;
    let listeners = spawn_signal_listeners(bar.router(), bar.shutdown_receiver())?;

    wait_for_shutdown(&bar).await?;

    info!("Status bar stopping...");
    bar.shutdown().await?;
    for listener in listeners {
        listener.abort();
    }
    daemon.unregister_self()?;
    debug!("cmd_run: shutdown complete");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown(bar: &StatusBar) -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    loop {
        tokio::select! {
            _ = sighup.recv() => {
                let woken = bar.refresh_all();
                info!(woken, "SIGHUP received - refreshing all triggered modules");
            }
            _ = sigint.recv() => {
                info!("SIGINT received");
                return Ok(());
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received");
                return Ok(());
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown(_bar: &StatusBar) -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}

/// Print the line every module would produce right now
async fn cmd_once(layout: &BarLayout) -> Result<()> {
    debug!("cmd_once: called");
    let line = render_once(layout).await?;
    println!("{}", line);
    Ok(())
}

/// Print the validated module table
fn cmd_check(layout: &BarLayout) -> Result<()> {
    debug!("cmd_check: called");
    println!("{:<10} {:<12} {:<8} {:<10} {:<8} SOURCE", "SLOT", "NAME", "KIND", "INTERVAL", "TRIGGER");
    for (slot, spec) in layout.slots() {
        let interval = match spec.refresh_mode() {
            RefreshMode::Interval(d) => format!("{}s", d.as_secs()),
            RefreshMode::TriggerOnly => "-".to_string(),
        };
        let trigger = spec.trigger.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string());
        let source = match &spec.producer {
            ProducerSpec::Command(command) => command,
            ProducerSpec::Clock(format) => format,
            ProducerSpec::Text(text) => text,
        };
        println!(
            "{:<10} {:<12} {:<8} {:<10} {:<8} {}",
            slot.to_string(),
            spec.name,
            spec.producer.kind(),
            interval,
            trigger,
            source
        );
    }
    println!("Configuration OK ({} modules)", layout.module_count());
    Ok(())
}

/// Send a trigger to the running status bar
fn cmd_trigger(raw: i64) -> Result<()> {
    debug!(raw, "cmd_trigger: called");
    let Some(id) = TriggerId::new(raw) else {
        warn!(raw, "Rejected out-of-range trigger");
        eprintln!("ERROR: trigger must be between 0 and 30, got {}", raw);
        std::process::exit(EXIT_INVALID_TRIGGER);
    };

    let pid = DaemonManager::new()
        .trigger(id)
        .map_err(|e| eyre!("Could not deliver trigger {}: {}", id, e))?;
    println!("Sent trigger {} to PID {}", id, pid);
    Ok(())
}

fn cmd_stop() -> Result<()> {
    debug!("cmd_stop: called");
    let daemon = DaemonManager::new();
    if !daemon.is_running() {
        println!("Status bar is not running");
        return Ok(());
    }
    daemon.stop()?;
    println!("Status bar stopped");
    Ok(())
}

fn cmd_status() -> Result<()> {
    debug!("cmd_status: called");
    let status = DaemonManager::new().status();
    println!("Status Bar");
    println!("----------");
    match status.pid {
        Some(pid) if status.running => {
            println!("Status: running");
            println!("PID: {}", pid);
        }
        _ => println!("Status: stopped"),
    }
    println!("PID file: {}", status.pid_file.display());
    println!("Version: {}", VERSION);
    Ok(())
}
