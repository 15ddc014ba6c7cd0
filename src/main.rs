use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod cmd;
mod config;
mod rpc;
mod utils;

use cmd::SupervisorArgs;
use config::{ConfigLayer, ConnectionConfig};

/// Supervisor CLI - control processes managed by a supervisord daemon
///
/// Command layout:
///   supervisor-cli supervisor <object> <action> [NAME] [--json]
///
/// Objects and their actions:
///   group         stop | start | restart | remove   (NAME required)
///   process       info | stop | start | restart     (NAME required)
///   allProcesses  info | stop | start | restart
///
/// Connection (flag > env > config file > default):
///   -H / --host      SUPERVISOR_HOST       127.0.0.1
///   -p / --port      SUPERVISOR_PORT       9001
///   -u / --username  SUPERVISOR_USERNAME
///   --password       SUPERVISOR_PASSWORD
///   --timeout        SUPERVISOR_TIMEOUT    30 (seconds)
///   -c / --config    JSON or YAML file with the same keys
///                    (host, port, username, password, timeout_secs)
///
/// Global flags / env:
///   -v / -vv        Increase verbosity
///   -q / --quiet    Errors only
///   SUPERVISOR_LOG  env_logger filter override
///   NO_COLOR        Disable coloured output
///
/// Examples:
///   supervisor-cli supervisor allProcesses info
///   supervisor-cli supervisor group restart web
///   supervisor-cli -H 10.0.0.5 -u admin --password s3cret supervisor process stop worker_1
#[derive(Parser, Debug)]
#[command(
    name = "supervisor-cli",
    version,
    author,
    about = "Supervisor CLI - start, stop, restart and inspect supervisord processes",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Connection config file (JSON, or YAML with .yaml/.yml extension)
    #[arg(short = 'c', long = "config", global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Daemon host
    #[arg(short = 'H', long, global = true)]
    host: Option<String>,

    /// Daemon XML-RPC port
    #[arg(short = 'p', long, global = true)]
    port: Option<u16>,

    /// HTTP basic auth user
    #[arg(short = 'u', long, global = true)]
    username: Option<String>,

    /// HTTP basic auth password
    #[arg(long, global = true)]
    password: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long = "timeout", global = true, value_name = "SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start, stop, restart or inspect a process, a group, or all processes
    Supervisor(SupervisorArgs),
}

impl Cli {
    fn flag_layer(&self) -> ConfigLayer {
        ConfigLayer {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    fn connection_config(&self) -> Result<ConnectionConfig> {
        let file = match &self.config {
            Some(path) => ConfigLayer::from_file(path)?,
            None => ConfigLayer::default(),
        };
        let env = ConfigLayer::from_env()?;
        ConnectionConfig::resolve([self.flag_layer(), env, file])
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let config = cli
        .connection_config()
        .context("Invalid connection settings")?;
    let client = rpc::XmlRpcClient::new(&config)?;
    log::info!("using supervisor at {}", client.endpoint());

    let ok = match &cli.command {
        Commands::Supervisor(args) => cmd::execute_supervisor(args, &client)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
