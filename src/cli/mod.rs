//! CLI module for chatline.
//!
//! Argument parsing and the commands that finish before a chat session
//! starts. Call the dispatcher early in `main()`:
//!
//! ```ignore
//! use chatline::cli::{parse_args, run_cli_command, CliCommand};
//!
//! let command = parse_args(std::env::args())?;
//! if let Some(options) = run_cli_command(command) {
//!     // start the chat session with `options`
//! }
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, RunOptions, USAGE};
pub use version::{handle_version_command, VERSION};

/// Run a CLI command if applicable.
///
/// Returns the session options for [`CliCommand::Run`], `None` once a
/// non-interactive command has been handled. `Version` never returns.
pub fn run_cli_command(command: CliCommand) -> Option<RunOptions> {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}", USAGE);
            None
        }
        CliCommand::Run(options) => Some(options),
    }
}
