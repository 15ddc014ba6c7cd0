/*!
`supervisor.rs`

Implements the `supervisor` subcommand:

  supervisor-cli supervisor <object> <action> [name] [--json]

Objects / actions:
  group         stop | start | restart | remove   (name required)
  process       info | stop | start | restart     (name required)
  allProcesses  info | stop | start | restart

Flow (`run`):
  1. parse tokens (kind -> action -> name)           no remote call
  2. group targets: fetch inventory, check the name  read-only call
  3. dispatch the step plan                          stops at first failure
  4. render status lines / info table
Any failure becomes exactly one error record at the end of the report.

JSON Output Shape (--json):
{
  "status": "ok" | "error",
  "records": [
    { "kind": "line",  "text": "stopping group \"web\"..." },
    { "kind": "table", "headers": [...], "rows": [[...]] },
    { "kind": "error", "message": "..." }
  ]
}
*/

use anyhow::Result;
use clap::Args;
use thiserror::Error;

use super::dispatch::execute;
use super::format::{StyleOptions, render_report};
use super::report::{OutputRecord, render};
use super::validate::{ValidationError, check_target, needs_inventory, parse_request};
use crate::rpc::{RemoteError, SupervisorClient};

/// CLI arguments for `supervisor-cli supervisor <object> <action> [name]`
#[derive(Args, Debug)]
pub struct SupervisorArgs {
    /// Object to act on (group|process|allProcesses)
    #[arg(value_name = "OBJECT")]
    pub object: String,

    /// Action (info|stop|start|restart|remove, depending on the object)
    #[arg(value_name = "ACTION")]
    pub action: String,

    /// Name of the process or group
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

/// Anything that ends a command early.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Ordered output of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    pub records: Vec<OutputRecord>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        !self.records.iter().any(OutputRecord::is_error)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": if self.is_success() { "ok" } else { "error" },
            "records": self.records,
        })
    }
}

/// Validate, dispatch and render one command.
pub fn run<C: SupervisorClient + ?Sized>(
    kind_raw: &str,
    action_raw: &str,
    name_raw: Option<&str>,
    client: &C,
) -> Report {
    let req = match parse_request(kind_raw, action_raw, name_raw) {
        Ok(req) => req,
        Err(err) => return failure(Vec::new(), err.into()),
    };

    if needs_inventory(&req) {
        let inventory = match client.get_all_process_info() {
            Ok(inventory) => inventory,
            Err(err) => return failure(Vec::new(), err.into()),
        };
        if let Err(err) = check_target(&req, &inventory) {
            return failure(Vec::new(), err.into());
        }
    }

    log::debug!(
        "dispatching {} {} {}",
        req.kind(),
        req.action(),
        req.name().unwrap_or("-")
    );
    let outcome = execute(&req, client);
    let records = render(&outcome);
    match outcome.failed {
        Some((_, err)) => failure(records, err.into()),
        None => Report { records },
    }
}

fn failure(mut records: Vec<OutputRecord>, err: CommandError) -> Report {
    log::debug!("command failed: {err:?}");
    records.push(OutputRecord::error(err.to_string()));
    Report { records }
}

/// Entry point for the supervisor subcommand. Returns whether the command succeeded.
pub fn execute_supervisor<C: SupervisorClient + ?Sized>(
    args: &SupervisorArgs,
    client: &C,
) -> Result<bool> {
    let report = run(&args.object, &args.action, args.name.as_deref(), client);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        let style = StyleOptions::detect();
        let text = render_report(&report.records, &style);
        if !text.is_empty() {
            println!("{text}");
        }
    }

    Ok(report.is_success())
}
