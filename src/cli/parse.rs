use clap::Args;
use clap::ValueEnum;

/// Arguments for the `parse` subcommand.
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// URLs to parse. When omitted, reads one URL per line from stdin.
    pub urls: Vec<String>,

    /// Print a JSON array instead of text.
    #[arg(long, conflicts_with = "field")]
    pub json: bool,

    /// Print only this field, one line per URL.
    #[arg(long, value_enum)]
    pub field: Option<Field>,

    /// Exit with an error if any URL is invalid.
    #[arg(long)]
    pub strict: bool,
}

/// A single component of a parsed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Field {
    Valid,
    Platform,
    Protocol,
    Host,
    Port,
    User,
    Owner,
    /// Nested groups joined with `/`.
    Groups,
    Repo,
    Path,
    Pathname,
    Branch,
}
