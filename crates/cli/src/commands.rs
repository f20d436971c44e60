//! Clap command tree definition.

use clap::{Arg, ArgAction, ArgGroup, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("snapdiff")
        .about("Display differences between two Btrfs snapshots")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Debug logging on stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_diff())
        .subcommand(build_dump())
}

fn build_diff() -> Command {
    Command::new("diff")
        .about("Narrate per-path changes of a send stream")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .help("Existing send stream file"),
        )
        .arg(
            Arg::new("parent")
                .short('p')
                .long("parent")
                .help("Parent snapshot (must exist and be read-only)")
                .requires("child"),
        )
        .arg(
            Arg::new("child")
                .short('c')
                .long("child")
                .help("Child snapshot")
                .requires("parent"),
        )
        .group(
            ArgGroup::new("source")
                .args(["file", "parent"])
                .required(true),
        )
        .arg(
            Arg::new("filter")
                .short('t')
                .long("filter")
                .help("Hide temporary files and keep only the latest time change")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("csv")
                .short('s')
                .long("csv")
                .help("One ';'-separated record per path")
                .action(ArgAction::SetTrue)
                .conflicts_with("json"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-lineage")
                .long("no-lineage")
                .help("Do not list renames under their destination path")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug-elided")
                .long("debug-elided")
                .help("Report hidden temporary paths with unusual actions")
                .action(ArgAction::SetTrue)
                .requires("filter"),
        )
        .arg(
            Arg::new("utc")
                .long("utc")
                .help("Render times in UTC instead of the local time zone")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("delete")
                .long("delete")
                .help("Delete the stream file once read")
                .action(ArgAction::SetTrue)
                .requires("file"),
        )
        .arg(
            Arg::new("with-data")
                .long("with-data")
                .help("Ask btrfs send for file data instead of extent updates")
                .action(ArgAction::SetTrue)
                .requires("parent"),
        )
        .arg(
            Arg::new("clone-sequential")
                .long("clone-sequential")
                .help("Read clone attributes in wire order")
                .action(ArgAction::SetTrue),
        )
}

fn build_dump() -> Command {
    Command::new("dump")
        .about("Print every decoded command of a send stream")
        .arg(
            Arg::new("file")
                .help("Send stream file")
                .required(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("clone-sequential")
                .long("clone-sequential")
                .help("Read clone attributes in wire order")
                .action(ArgAction::SetTrue),
        )
}
