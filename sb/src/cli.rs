//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::daemon::DaemonManager;

/// sb - signal-driven status bar for dwm
#[derive(Parser)]
#[command(
    name = "sb",
    about = "Composes module outputs into one status line and refreshes them on timers or signals",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the status bar in the foreground
    Run,

    /// Run every module once, print the composed line and exit
    Once,

    /// Validate the configuration and list the modules
    Check,

    /// Refresh the modules on a trigger in the running status bar
    Trigger {
        /// Trigger id (0-30)
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Stop the running status bar
    Stop,

    /// Show whether the status bar is running
    Status,
}

/// Availability of an external program the status bar relies on
#[derive(Debug)]
pub struct ToolCheck {
    pub name: &'static str,
    pub available: bool,
}

impl ToolCheck {
    /// Check whether `name` can be started
    pub fn check(name: &'static str, args: &[&str]) -> Self {
        debug!(name, ?args, "ToolCheck::check: called");
        let available = std::process::Command::new(name)
            .args(args)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .is_ok();
        Self { name, available }
    }
}

/// Check the programs used by the default publisher and command modules
pub fn check_required_tools() -> Vec<ToolCheck> {
    debug!("check_required_tools: called");
    vec![ToolCheck::check("xsetroot", &["-version"]), ToolCheck::check("sh", &["-c", "true"])]
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("statusbar")
        .join("logs")
        .join("statusbar.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Whether the command line asks for help (`-h`, `--help` or `help`)
pub fn wants_help<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .skip(1)
        .any(|arg| matches!(arg.as_ref(), "-h" | "--help" | "help"))
}

/// Generate the after_help text with tool checks and daemon status
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let mut help = String::new();

    help.push_str("Required Tools:\n");
    for tool in check_required_tools() {
        let icon = if tool.available { "\u{2705}" } else { "\u{274C}" };
        help.push_str(&format!("  {} {}\n", icon, tool.name));
    }

    help.push('\n');
    help.push_str("Status bar:\n");
    match DaemonManager::new().running_pid() {
        Some(pid) => help.push_str(&format!("  \u{2705} running (PID {})\n", pid)),
        None => help.push_str("  \u{274C} stopped\n"),
    }

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["sb"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_trigger_accepts_out_of_range_ids() {
        let cli = Cli::try_parse_from(["sb", "trigger", "-3"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Trigger { id: -3 })));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["sb", "once", "-c", "/tmp/bar.yml", "-l", "debug"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/bar.yml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_wants_help() {
        assert!(wants_help(["sb", "--help"]));
        assert!(wants_help(["sb", "-h"]));
        assert!(wants_help(["sb", "help", "trigger"]));
        assert!(wants_help(["sb", "trigger", "--help"]));
        assert!(!wants_help(["sb", "trigger", "4"]));
        assert!(!wants_help(["sb"]));
        assert!(!wants_help(["help"]));
    }

    #[test]
    fn test_log_path_ends_with_file_name() {
        assert!(get_log_path().ends_with("statusbar/logs/statusbar.log"));
    }
}
