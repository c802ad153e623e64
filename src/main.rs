mod cli;
mod config;
mod output;

use std::borrow::Cow;
use std::io;
use std::io::BufRead;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::CommandFactory;
use clap::Parser;
use giturlparse::ParsedUrl;
use giturlparse::Registry;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::cli::Cli;
use crate::cli::Commands;
use crate::cli::parse::ParseArgs;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration");
            eprintln!("{:?}", miette::Report::new(e));
            std::process::exit(1);
        }
    };
    let registry = if config.hosts.is_empty() {
        Cow::Borrowed(Registry::builtin())
    } else {
        Cow::Owned(Registry::builtin().with_extra_hosts(&config.hosts))
    };

    match cli.command {
        Some(Commands::Parse(args)) => {
            parse_urls(&registry, &args)?;
        }
        Some(Commands::Completions(args)) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "giturlparse",
                &mut io::stdout(),
            );
        }
        Some(Commands::Platforms) | None => {
            print!("{}", output::render_platforms(registry.definitions()));
        }
    }

    Ok(())
}

/// RUST_LOG takes precedence; otherwise `--verbose` selects DEBUG and the
/// default is WARN.
fn init_tracing(verbose: bool) {
    let default = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init();
}

/// Parse every URL from the arguments, or from stdin when none are given,
/// and print them in the requested format.
fn parse_urls(registry: &Registry, args: &ParseArgs) -> Result<()> {
    let urls = if args.urls.is_empty() {
        read_urls(io::stdin().lock()).context("failed to read URLs from stdin")?
    } else {
        args.urls.clone()
    };

    let parsed: Vec<ParsedUrl> = urls.iter().map(|url| registry.parse(url)).collect();

    if args.json {
        let json = output::render_json(&parsed).context("failed to serialize results")?;
        println!("{json}");
    } else if let Some(field) = args.field {
        for url in &parsed {
            println!("{}", output::field_value(url, field));
        }
    } else {
        for (i, url) in parsed.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print!("{}", output::render_text(url));
        }
    }

    let invalid = parsed.iter().filter(|url| !url.valid()).count();
    if args.strict && invalid > 0 {
        bail!("{invalid} of {} URL(s) are invalid", parsed.len());
    }

    Ok(())
}

/// Non-empty, trimmed lines. Invalid UTF-8 is replaced rather than fatal, so
/// such lines come out as invalid URLs.
fn read_urls(mut reader: impl BufRead) -> io::Result<Vec<String>> {
    let mut urls = Vec::new();
    let mut buf = Vec::new();
    while reader.read_until(b'\n', &mut buf)? > 0 {
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if !line.is_empty() {
            urls.push(line.to_string());
        }
        buf.clear();
    }
    Ok(urls)
}
