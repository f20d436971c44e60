//! snapdiff: display differences between two Btrfs snapshots.
//!
//! Two subcommands:
//! - **diff**: `snapdiff diff -f FILE` or `snapdiff diff -p PARENT -c CHILD`
//!   narrates per-path changes of a send stream
//! - **dump**: `snapdiff dump FILE` prints every decoded command

mod commands;
mod format;
mod logging;

use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::ArgMatches;
use snapdiff_diff::{narrate, NarrateOptions, TimeZoneMode};
use snapdiff_stream::{read_stream, CloneLayout, DecodeOptions, SendInvocation, SendStream};
use tracing::debug;

use commands::build_cli;
use format::{format_dump, format_narration, OutputMode};
use logging::{init_subscriber, Verbosity};

fn main() {
    let matches = build_cli().get_matches();

    init_subscriber(Verbosity::from_flags(
        matches.get_flag("verbose"),
        matches.get_flag("quiet"),
    ));

    let result = match matches.subcommand() {
        Some(("diff", sub)) => run_diff(sub),
        Some(("dump", sub)) => run_dump(sub),
        _ => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn clone_layout(matches: &ArgMatches) -> CloneLayout {
    if matches.get_flag("clone-sequential") {
        CloneLayout::Sequential
    } else {
        CloneLayout::Observed
    }
}

/// Local time unless `--utc` is given.
fn time_zone(matches: &ArgMatches) -> TimeZoneMode {
    if matches.get_flag("utc") {
        TimeZoneMode::Utc
    } else {
        TimeZoneMode::Local
    }
}

fn run_diff(matches: &ArgMatches) -> Result<()> {
    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else if matches.get_flag("csv") {
        OutputMode::Csv
    } else {
        OutputMode::Human
    };

    let decode_options = DecodeOptions::new()
        .with_lineage(!matches.get_flag("no-lineage"))
        .with_clone_layout(clone_layout(matches));

    let filter = matches.get_flag("filter");
    let narrate_options = NarrateOptions::new()
        .with_filter_temporary(filter)
        .with_collapse_times(filter)
        .with_debug_elided(matches.get_flag("debug-elided"))
        .with_time_zone(time_zone(matches));
    narrate_options.validate()?;

    let bytes = load_stream(matches)?;
    let stream = SendStream::parse(&bytes).context("Invalid stream header")?;
    if mode == OutputMode::Human {
        println!(
            "Found a valid Btrfs stream header, version {}",
            stream.header().version
        );
    }

    let decoded = stream
        .decode(&decode_options)
        .context("Failed to decode send stream")?;
    let narration = narrate(&decoded, &narrate_options);

    let formatted = format_narration(&narration, mode);
    if !formatted.is_empty() {
        print!("{}", formatted);
    }
    if mode == OutputMode::Json {
        println!();
    }
    Ok(())
}

/// Stream bytes from `--file`, or from a fresh `btrfs send` run.
fn load_stream(matches: &ArgMatches) -> Result<Vec<u8>> {
    if let Some(file) = matches.get_one::<String>("file") {
        return Ok(read_stream(Path::new(file), matches.get_flag("delete"))?);
    }

    let (Some(parent), Some(child)) = (
        matches.get_one::<String>("parent"),
        matches.get_one::<String>("child"),
    ) else {
        anyhow::bail!("Parent needs child");
    };

    // Removed when dropped
    let output = tempfile::Builder::new()
        .prefix("snapdiff-")
        .tempfile()
        .context("Failed to create stream file")?
        .into_temp_path();

    let send = SendInvocation::new(parent, child, output.to_path_buf())
        .with_data(matches.get_flag("with-data"));
    debug!(command = %send.command_line(), "Producing stream");
    send.run()?;

    Ok(read_stream(&output, false)?)
}

fn run_dump(matches: &ArgMatches) -> Result<()> {
    let file = matches
        .get_one::<String>("file")
        .context("Missing stream file")?;
    let bytes = read_stream(Path::new(file), false)?;

    let options = DecodeOptions::new().with_clone_layout(clone_layout(matches));
    let decoded = SendStream::parse(&bytes)
        .and_then(|stream| stream.decode(&options))
        .with_context(|| format!("Failed to decode {}", file))?;

    print!("{}", format_dump(&decoded.commands, matches.get_flag("json")));
    if matches.get_flag("json") {
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff_matches(args: &[&str]) -> ArgMatches {
        let matches = build_cli()
            .try_get_matches_from(["snapdiff", "diff", "-f", "stream.bin"].iter().chain(args))
            .unwrap();
        matches.subcommand_matches("diff").unwrap().clone()
    }

    #[test]
    fn test_times_default_to_local_zone() {
        assert_eq!(time_zone(&diff_matches(&[])), TimeZoneMode::Local);
        assert_eq!(time_zone(&diff_matches(&["--utc"])), TimeZoneMode::Utc);
    }

    #[test]
    fn test_clone_layout_flag() {
        assert_eq!(clone_layout(&diff_matches(&[])), CloneLayout::Observed);
        assert_eq!(
            clone_layout(&diff_matches(&["--clone-sequential"])),
            CloneLayout::Sequential
        );
    }
}
