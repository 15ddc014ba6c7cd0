/*!
`report.rs`

Renders a `CommandOutcome` into ordered output records:

  - transitions: announce line ("stopping group \"web\"..."), then "stopped"/"started"
  - info queries: one table, header = INFO_HEADERS, one row per process
  - unsupported steps: one error record

A failed step still gets its announce line (the call was attempted) but
no completion line. The failure message itself is appended by the
command facade.
*/

use serde::Serialize;

use super::dispatch::{CommandOutcome, Step, StepResult};
use super::model::{INFO_HEADERS, ProcessInfo};

/// One unit of user-facing output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputRecord {
    Line { text: String },
    Error { message: String },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl OutputRecord {
    pub fn line(text: impl Into<String>) -> Self {
        OutputRecord::Line { text: text.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        OutputRecord::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OutputRecord::Error { .. })
    }
}

/// Line printed before a transition call is made.
pub fn announce(step: &Step) -> Option<String> {
    let text = match step {
        Step::StopAll => "stopping all processes...".to_string(),
        Step::StartAll => "starting all processes...".to_string(),
        Step::StopGroup(g) => format!("stopping group \"{g}\"..."),
        Step::StartGroup(g) => format!("starting group \"{g}\"..."),
        Step::StopProcess(p) => format!("stopping process \"{p}\"..."),
        Step::StartProcess(p) => format!("starting process \"{p}\"..."),
        Step::AllInfo | Step::ProcessInfo(_) | Step::Unsupported(_) => return None,
    };
    Some(text)
}

/// Line printed once a transition call returned.
pub fn completion(step: &Step) -> Option<&'static str> {
    match step {
        Step::StopAll | Step::StopGroup(_) | Step::StopProcess(_) => Some("stopped"),
        Step::StartAll | Step::StartGroup(_) | Step::StartProcess(_) => Some("started"),
        Step::AllInfo | Step::ProcessInfo(_) | Step::Unsupported(_) => None,
    }
}

/// Fixed-column info table. `None` when there is nothing to show.
pub fn info_table(infos: &[ProcessInfo]) -> Option<OutputRecord> {
    if infos.is_empty() {
        return None;
    }
    Some(OutputRecord::Table {
        headers: INFO_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows: infos.iter().map(ProcessInfo::cells).collect(),
    })
}

pub fn render(outcome: &CommandOutcome) -> Vec<OutputRecord> {
    let mut records = Vec::new();
    for result in &outcome.completed {
        match result {
            StepResult::Done(step) => {
                records.extend(announce(step).map(OutputRecord::line));
                records.extend(completion(step).map(OutputRecord::line));
            }
            StepResult::Info(infos) => records.extend(info_table(infos)),
            StepResult::Unsupported(message) => records.push(OutputRecord::error(*message)),
        }
    }
    if let Some((step, _)) = &outcome.failed {
        records.extend(announce(step).map(OutputRecord::line));
    }
    records
}
