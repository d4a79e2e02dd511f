//! Matches to actions
//!
//! Resolves the configuration (file, then flag overrides) and turns the chosen
//! subcommand into a [`CliAction`].

use clap::ArgMatches;
use occkv_server::ClusterConfig;
use std::time::Duration;

/// What the binary should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    /// Serve the store
    Store(ClusterConfig),
    /// Serve the validator
    Validator(ClusterConfig),
    /// Serve the dispatcher
    Dispatcher(ClusterConfig),
    /// Serve everything in one process
    All(ClusterConfig),
    /// Drive random transactions through a dispatcher
    Client(WorkloadSpec),
}

/// Shape of the random workload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadSpec {
    /// Dispatcher to ask for a coordinator
    pub dispatcher: String,
    /// Reads per transaction
    pub reads: usize,
    /// Writes per transaction
    pub writes: usize,
    /// First key touched
    pub start: u64,
    /// Number of keys touched
    pub range: u64,
    /// How long to keep starting transactions
    pub duration: Duration,
    /// Pause between operations
    pub pause: Duration,
    /// Leave the coordinator running at the end instead of stopping it
    pub keep: bool,
}

/// Resolve the configuration for these matches
pub fn resolve_config(matches: &ArgMatches) -> Result<ClusterConfig, String> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => ClusterConfig::load(path).map_err(|e| format!("{}: {}", path, e))?,
        None => ClusterConfig::default(),
    };
    if let Some(entries) = matches.get_one::<usize>("entries") {
        config = config.with_entries(*entries);
    }
    Ok(config)
}

/// Convert matches to an action
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let config = resolve_config(matches)?;
    let (sub_name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "store" => Ok(CliAction::Store(config)),
        "validator" => Ok(CliAction::Validator(config)),
        "dispatcher" => Ok(CliAction::Dispatcher(config)),
        "all" => Ok(CliAction::All(config)),
        "client" => parse_client(sub_matches, &config).map(CliAction::Client),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn parse_client(matches: &ArgMatches, config: &ClusterConfig) -> Result<WorkloadSpec, String> {
    let dispatcher = matches
        .get_one::<String>("dispatcher")
        .cloned()
        .unwrap_or_else(|| config.dispatcher.addr.clone());

    Ok(WorkloadSpec {
        dispatcher,
        reads: number(matches, "reads")?,
        writes: number(matches, "writes")?,
        start: number(matches, "start")?,
        range: number(matches, "range")?,
        duration: Duration::from_secs(number(matches, "duration")?),
        pause: Duration::from_millis(number(matches, "pause-ms")?),
        keep: matches.get_flag("keep"),
    })
}

fn number<T: Copy + Send + Sync + 'static>(matches: &ArgMatches, name: &str) -> Result<T, String> {
    matches
        .get_one::<T>(name)
        .copied()
        .ok_or_else(|| format!("Missing --{}", name))
}
