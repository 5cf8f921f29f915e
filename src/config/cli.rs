use std::path::PathBuf;

use clap::{Args, FromArgMatches, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the Blogify binary.
#[derive(Debug, Parser)]
#[command(name = "blogify", version, about = "Blogify blog server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "BLOGIFY_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the Blogify HTTP service.
    Serve(Box<ServeArgs>),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

impl ServeArgs {
    /// Resolve serve arguments when no subcommand was given, so env-backed
    /// overrides still apply to a bare `blogify` invocation.
    pub fn from_env() -> Result<Self, clap::Error> {
        let matches =
            Self::augment_args(clap::Command::new("serve")).try_get_matches_from(["serve"])?;
        Self::from_arg_matches(&matches)
    }
}

/// Per-run overrides. The plain environment names match the variables the
/// service has always been deployed with.
#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "host", value_name = "HOST")]
    pub host: Option<String>,

    /// Override the listener port.
    #[arg(long = "port", env = "PORT", value_name = "PORT")]
    pub port: Option<u16>,

    /// Browser origin allowed to call the API cross-origin.
    #[arg(long = "frontend-url", env = "FRONTEND_URL", value_name = "URL")]
    pub frontend_url: Option<String>,

    /// Override the SQLite database file path.
    #[arg(long = "db-path", env = "DB_PATH", value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// API key for the Groq completion service.
    #[arg(
        long = "groq-api-key",
        env = "GROQ_API_KEY",
        value_name = "KEY",
        hide_env_values = true
    )]
    pub groq_api_key: Option<String>,

    /// Override the completion service base URL.
    #[arg(long = "groq-base-url", value_name = "URL")]
    pub groq_base_url: Option<String>,

    /// Override the completion model name.
    #[arg(long = "groq-model", value_name = "MODEL")]
    pub groq_model: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}
