// Command-line arguments. Parsing errors are reported with a single
// usage line and exit status 1 rather than clap's default status 2.
// Ids and tokens are opaque and may start with `-`, so options must come
// before the two positionals.

use crate::config::DEFAULT_ENV_FILE;
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

pub const USAGE: &str = "Usage: nutrilyzer-seed <userId> <token>";

/// Seed the nutrition service with a demo food item, meal and daily log.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "nutrilyzer-seed", version)]
pub struct Cli {
    /// Id of the user that owns the created records
    #[arg(allow_hyphen_values = true)]
    pub user_id: String,

    /// Bearer token for the nutrition service
    #[arg(allow_hyphen_values = true)]
    pub token: String,

    /// Base URL of the service (overrides VITE_API_URL)
    #[arg(long)]
    pub server_url: Option<String>,

    /// Env file to read VITE_API_URL from, if it exists; relative paths
    /// are resolved against the working directory
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,
}

impl Cli {
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Cli::try_parse_from(args)
    }

    /// Parse the process arguments, exiting on `--help`, `--version` or
    /// any malformed invocation.
    pub fn parse_or_exit() -> Self {
        match Cli::try_parse_args(std::env::args_os()) {
            Ok(cli) => cli,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
            Err(_) => {
                eprintln!("{USAGE}");
                std::process::exit(1);
            }
        }
    }
}
