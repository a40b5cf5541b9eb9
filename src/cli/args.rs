//! Command-line argument parsing for chatline.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use std::fmt;

/// Options for an interactive chat session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOptions {
    /// Backend base URL, overriding `CHATLINE_BASE_URL`
    pub base_url: Option<String>,
    /// Start a new conversation instead of resuming the persisted one
    pub new_conversation: bool,
    /// Print debug events as JSON lines on stderr
    pub debug_events: bool,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Run the chat session (default)
    Run(RunOptions),
}

/// Argument errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    /// A flag that takes a value was last on the command line
    MissingValue(&'static str),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue(flag) => write!(f, "{} requires a value", flag),
        }
    }
}

impl std::error::Error for ArgsError {}

/// Usage text printed for `--help`.
pub const USAGE: &str = "\
Usage: chatline [OPTIONS]

Options:
  --url <BASE>      Backend base URL (default: $CHATLINE_BASE_URL or http://localhost:8000)
  --new             Start a new conversation
  --debug-events    Print debug events as JSON lines on stderr
  -h, --help        Show this help
  -V, --version     Show version

Commands inside the session:
  /new              Start a new conversation
  /quit             Exit";

/// Parse command-line arguments and return the appropriate command.
///
/// The first item is the program name and is skipped. Unknown arguments are
/// ignored. `--version` and `--help` win over everything else.
///
/// # Examples
///
/// ```
/// use chatline::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["chatline".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut options = RunOptions::default();
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--url" => {
                let value = args.next().ok_or(ArgsError::MissingValue("--url"))?;
                options.base_url = Some(value);
            }
            "--new" => options.new_conversation = true,
            "--debug-events" => options.debug_events = true,
            other => {
                if let Some(value) = other.strip_prefix("--url=") {
                    options.base_url = Some(value.to_string());
                }
            }
        }
    }
    Ok(CliCommand::Run(options))
}
