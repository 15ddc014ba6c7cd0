/*!
`dispatch.rs`

Maps a validated `CommandRequest` onto an ordered plan of remote steps and
runs it against a `SupervisorClient`.

Compound actions (restart) are plain multi-step plans: stop, then start.
Execution stops at the first failing step. Nothing is retried or undone;
the daemon owns process state, this module only requests transitions and
records what happened.
*/

use super::model::{Action, CommandRequest, ProcessInfo, Target};
use crate::rpc::{RemoteError, SupervisorClient};

/// Shown for the one legal action nothing on the daemon side implements.
pub const REMOVE_GROUP_UNSUPPORTED: &str = "this is not implemented. please remove group manually.";

/// One unit of a plan. Every variant except `Unsupported` is exactly one remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    AllInfo,
    ProcessInfo(String),
    StopAll,
    StartAll,
    StopGroup(String),
    StartGroup(String),
    StopProcess(String),
    StartProcess(String),
    Unsupported(&'static str),
}

impl Step {
    /// Remote method name, for logs.
    pub fn method(&self) -> Option<&'static str> {
        let method = match self {
            Step::AllInfo => "getAllProcessInfo",
            Step::ProcessInfo(_) => "getProcessInfo",
            Step::StopAll => "stopAllProcesses",
            Step::StartAll => "startAllProcesses",
            Step::StopGroup(_) => "stopProcessGroup",
            Step::StartGroup(_) => "startProcessGroup",
            Step::StopProcess(_) => "stopProcess",
            Step::StartProcess(_) => "startProcess",
            Step::Unsupported(_) => return None,
        };
        Some(method)
    }
}

/// What a finished step produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// A stop/start call went through.
    Done(Step),
    /// An info query answered.
    Info(Vec<ProcessInfo>),
    /// The step is not something this tool can do.
    Unsupported(&'static str),
}

/// Completed steps in order, plus the step that failed (if any).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandOutcome {
    pub completed: Vec<StepResult>,
    pub failed: Option<(Step, RemoteError)>,
}

/// Ordered steps for a request.
///
/// Pairs outside the action table never reach this point; they map to an
/// empty plan so no remote call can come out of them.
pub fn plan(req: &CommandRequest) -> Vec<Step> {
    match (req.target(), req.action()) {
        (Target::AllProcesses, Action::Info) => vec![Step::AllInfo],
        (Target::AllProcesses, Action::Stop) => vec![Step::StopAll],
        (Target::AllProcesses, Action::Start) => vec![Step::StartAll],
        (Target::AllProcesses, Action::Restart) => vec![Step::StopAll, Step::StartAll],

        (Target::Group(g), Action::Stop) => vec![Step::StopGroup(g.clone())],
        (Target::Group(g), Action::Start) => vec![Step::StartGroup(g.clone())],
        (Target::Group(g), Action::Restart) => {
            vec![Step::StopGroup(g.clone()), Step::StartGroup(g.clone())]
        }
        (Target::Group(_), Action::Remove) => vec![Step::Unsupported(REMOVE_GROUP_UNSUPPORTED)],

        (Target::Process(p), Action::Info) => vec![Step::ProcessInfo(p.clone())],
        (Target::Process(p), Action::Stop) => vec![Step::StopProcess(p.clone())],
        (Target::Process(p), Action::Start) => vec![Step::StartProcess(p.clone())],
        (Target::Process(p), Action::Restart) => {
            vec![Step::StopProcess(p.clone()), Step::StartProcess(p.clone())]
        }

        (Target::Group(_), Action::Info)
        | (Target::Process(_), Action::Remove)
        | (Target::AllProcesses, Action::Remove) => Vec::new(),
    }
}

/// Run one step.
pub fn run_step<C: SupervisorClient + ?Sized>(
    step: &Step,
    client: &C,
) -> Result<StepResult, RemoteError> {
    let done = |r: Result<(), RemoteError>| r.map(|()| StepResult::Done(step.clone()));
    match step {
        Step::AllInfo => client.get_all_process_info().map(StepResult::Info),
        Step::ProcessInfo(name) => client
            .get_process_info(name)
            .map(|info| StepResult::Info(vec![info])),
        Step::StopAll => done(client.stop_all_processes()),
        Step::StartAll => done(client.start_all_processes()),
        Step::StopGroup(group) => done(client.stop_process_group(group)),
        Step::StartGroup(group) => done(client.start_process_group(group)),
        Step::StopProcess(name) => done(client.stop_process(name)),
        Step::StartProcess(name) => done(client.start_process(name)),
        Step::Unsupported(message) => Ok(StepResult::Unsupported(*message)),
    }
}

/// Run the plan for `req`, aborting at the first failing step.
pub fn execute<C: SupervisorClient + ?Sized>(req: &CommandRequest, client: &C) -> CommandOutcome {
    let mut outcome = CommandOutcome::default();
    for step in plan(req) {
        log::debug!("dispatch {:?} ({})", step, step.method().unwrap_or("local"));
        match run_step(&step, client) {
            Ok(result) => outcome.completed.push(result),
            Err(err) => {
                log::debug!("step {:?} failed: {err}", step);
                outcome.failed = Some((step, err));
                break;
            }
        }
    }
    outcome
}
