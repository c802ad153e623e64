pub mod completions;
pub mod parse;

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use crate::cli::completions::CompletionsArgs;
use crate::cli::parse::ParseArgs;

/// Decompose Git repository URLs into host, owner, groups and repository.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Config file with extra platform hostnames.
    #[arg(long, global = true, env = "GITURLPARSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse Git URLs and print their components.
    Parse(ParseArgs),
    /// List the known platforms in match order.
    Platforms,
    /// Print a shell completion script.
    Completions(CompletionsArgs),
}
