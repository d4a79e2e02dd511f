//! Command tree

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the `occkv` command
pub fn build_cli() -> Command {
    Command::new("occkv")
        .about("Optimistic concurrency control over a shared versioned key-value store")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("PATH")
                .help("TOML cluster configuration"),
        )
        .arg(
            Arg::new("entries")
                .long("entries")
                .short('n')
                .global(true)
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Number of keys the store is seeded with"),
        )
        .subcommand(Command::new("store").about("Run the store"))
        .subcommand(Command::new("validator").about("Run the validator"))
        .subcommand(Command::new("dispatcher").about("Run the dispatcher"))
        .subcommand(Command::new("all").about("Run store, validator and dispatcher in one process"))
        .subcommand(
            Command::new("client")
                .about("Run random transactions against a dispatcher")
                .arg(
                    Arg::new("dispatcher")
                        .long("dispatcher")
                        .value_name("ADDR")
                        .help("Dispatcher address (defaults to the configured one)"),
                )
                .arg(
                    Arg::new("reads")
                        .long("reads")
                        .default_value("2")
                        .value_parser(value_parser!(usize))
                        .help("Reads per transaction"),
                )
                .arg(
                    Arg::new("writes")
                        .long("writes")
                        .default_value("2")
                        .value_parser(value_parser!(usize))
                        .help("Writes per transaction"),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .default_value("1")
                        .value_parser(value_parser!(u64))
                        .help("First key of the range touched"),
                )
                .arg(
                    Arg::new("range")
                        .long("range")
                        .default_value("10")
                        .value_parser(value_parser!(u64).range(1..))
                        .help("Number of keys touched"),
                )
                .arg(
                    Arg::new("duration")
                        .long("duration")
                        .default_value("10")
                        .value_parser(value_parser!(u64))
                        .help("Seconds to keep starting transactions"),
                )
                .arg(
                    Arg::new("pause-ms")
                        .long("pause-ms")
                        .default_value("100")
                        .value_parser(value_parser!(u64))
                        .help("Pause between operations, in milliseconds"),
                )
                .arg(
                    Arg::new("keep")
                        .long("keep")
                        .action(ArgAction::SetTrue)
                        .help("Leave the coordinator running when done"),
                ),
        )
}
