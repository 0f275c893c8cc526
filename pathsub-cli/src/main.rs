use anyhow::{Context, Result};
use clap::FromArgMatches;
use pathsub_core::{Config, MapperOptions};
use std::ffi::OsString;
use std::process;

mod cli;
mod logging;
mod plan;
mod rename;

use cli::types::SUBMV;
use cli::{Cli, OutputFormat, ToolStrings};

fn main() {
    process::exit(run(&SUBMV, std::env::args_os()));
}

/// Parse `args`, run the requested mode and return the process exit code.
fn run<I, T>(strings: &ToolStrings, args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::command_for(strings)
        .try_get_matches_from(args)
        .and_then(|matches| Cli::from_arg_matches(&matches))
    {
        Ok(cli) => cli,
        // Prints help/version and exits 0, usage errors exit 2
        Err(e) => e.exit(),
    };

    let quiet = cli.quiet;
    match execute(cli) {
        Ok(code) => code,
        Err(e) => {
            if !quiet {
                eprintln!("Error: {e:#}");
            }
            2
        },
    }
}

fn execute(cli: Cli) -> Result<i32> {
    let config = Config::load().context("Failed to load configuration")?;

    logging::init(
        logging::log_level(
            cli.quiet,
            cli.verbose,
            cli.trial,
            &config.defaults.log_level,
        ),
        cli.output == OutputFormat::Json,
    )?;

    let options = MapperOptions {
        search: cli.search,
        replace: cli.replace,
        literal: cli.literal || config.defaults.literal,
        ignore_case: cli.ignore_case || config.defaults.ignore_case,
        basename: cli.basename || config.defaults.basename,
    };
    tracing::debug!("{:?}", options);

    let use_color = if cli.no_color { Some(false) } else { None };

    if cli.plan {
        plan::handle_plan(&options, &cli.paths, cli.output, use_color)
    } else {
        rename::handle_rename(&options, &cli.paths, cli.trial, cli.output)
    }
}
