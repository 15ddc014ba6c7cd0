/*!
Domain model for the `supervisor` command.

Types:
  TargetKind    (group | process | allProcesses)
  Action        (info | stop | start | restart | remove)
  ACTION_TABLE  (kind -> legal actions, static data)
  Target        (kind + name, name carried only where required)
  CommandRequest
  ProcessInfo   (daemon-reported state, fixed column projection)

Helpers:
  - TargetKind::parse / Action::parse (exact token match)
  - allowed_actions() / is_allowed()
  - ProcessInfo::cells() (values in INFO_HEADERS order)
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a command acts on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TargetKind {
    /// A named process group
    Group,
    /// A single named process
    Process,
    /// Every process the daemon manages
    AllProcesses,
}

/// Lifecycle operation requested for a target.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    Info,
    Stop,
    Start,
    Restart,
    Remove,
}

/// Legal actions per target kind. Consulted by validation only.
pub const ACTION_TABLE: &[(TargetKind, &[Action])] = &[
    (
        TargetKind::Group,
        &[Action::Stop, Action::Start, Action::Restart, Action::Remove],
    ),
    (
        TargetKind::Process,
        &[Action::Info, Action::Stop, Action::Start, Action::Restart],
    ),
    (
        TargetKind::AllProcesses,
        &[Action::Info, Action::Start, Action::Stop, Action::Restart],
    ),
];

/// Kinds whose commands must name their target.
pub const NAMED_KINDS: &[TargetKind] = &[TargetKind::Group, TargetKind::Process];

impl TargetKind {
    /// Order matters for help display.
    pub const fn variants() -> &'static [TargetKind] {
        &[
            TargetKind::Group,
            TargetKind::Process,
            TargetKind::AllProcesses,
        ]
    }

    /// Token as typed on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Group => "group",
            TargetKind::Process => "process",
            TargetKind::AllProcesses => "allProcesses",
        }
    }

    /// Exact (case-sensitive) token match after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim();
        Self::variants()
            .iter()
            .copied()
            .find(|k| k.as_str() == token)
    }

    pub fn allowed_actions(&self) -> &'static [Action] {
        ACTION_TABLE
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, actions)| *actions)
            .unwrap_or(&[])
    }

    pub fn is_allowed(&self, action: Action) -> bool {
        self.allowed_actions().contains(&action)
    }

    pub fn requires_name(&self) -> bool {
        NAMED_KINDS.contains(self)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Action {
    pub const fn variants() -> &'static [Action] {
        &[
            Action::Info,
            Action::Stop,
            Action::Start,
            Action::Restart,
            Action::Remove,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Info => "info",
            Action::Stop => "stop",
            Action::Start => "start",
            Action::Restart => "restart",
            Action::Remove => "remove",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim();
        Self::variants()
            .iter()
            .copied()
            .find(|a| a.as_str() == token)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated target. Named kinds always carry a non-empty name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Target {
    Group(String),
    Process(String),
    AllProcesses,
}

impl Target {
    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Group(_) => TargetKind::Group,
            Target::Process(_) => TargetKind::Process,
            Target::AllProcesses => TargetKind::AllProcesses,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Target::Group(name) | Target::Process(name) => Some(name),
            Target::AllProcesses => None,
        }
    }
}

/// A command that passed the legality checks of the action table.
///
/// Only the validator builds these, so every request seen by the
/// dispatcher names a legal (kind, action) pair.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandRequest {
    target: Target,
    action: Action,
}

impl CommandRequest {
    pub(crate) fn new(target: Target, action: Action) -> Self {
        Self { target, action }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn kind(&self) -> TargetKind {
        self.target.kind()
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn name(&self) -> Option<&str> {
        self.target.name()
    }
}

/// Column order of every info table.
pub const INFO_HEADERS: [&str; 7] = ["pid", "name", "group", "statename", "start", "stop", "state"];

/// Process state as reported by the daemon. `start`/`stop` are UNIX seconds.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: i64,
    pub name: String,
    pub group: String,
    pub statename: String,
    pub start: i64,
    pub stop: i64,
    pub state: i64,
}

impl ProcessInfo {
    /// Cell values in `INFO_HEADERS` order.
    pub fn cells(&self) -> Vec<String> {
        INFO_HEADERS
            .iter()
            .map(|column| self.column(column).unwrap_or_default())
            .collect()
    }

    pub fn column(&self, header: &str) -> Option<String> {
        let value = match header {
            "pid" => self.pid.to_string(),
            "name" => self.name.clone(),
            "group" => self.group.clone(),
            "statename" => self.statename.clone(),
            "start" => self.start.to_string(),
            "stop" => self.stop.to_string(),
            "state" => self.state.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
pub(crate) fn sample_info(name: &str, group: &str) -> ProcessInfo {
    ProcessInfo {
        pid: 4242,
        name: name.to_string(),
        group: group.to_string(),
        statename: "RUNNING".to_string(),
        start: 1_700_000_000,
        stop: 0,
        state: 20,
    }
}

/* --------------------------------- Tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exact_tokens() {
        assert_eq!(TargetKind::parse("group"), Some(TargetKind::Group));
        assert_eq!(TargetKind::parse(" process "), Some(TargetKind::Process));
        assert_eq!(
            TargetKind::parse("allProcesses"),
            Some(TargetKind::AllProcesses)
        );
        assert_eq!(TargetKind::parse("allprocesses"), None);
        assert_eq!(TargetKind::parse("groups"), None);
        assert_eq!(Action::parse("restart"), Some(Action::Restart));
        assert_eq!(Action::parse("Restart"), None);
    }

    #[test]
    fn action_table_matches_legal_pairs() {
        assert_eq!(
            TargetKind::Group.allowed_actions(),
            &[Action::Stop, Action::Start, Action::Restart, Action::Remove]
        );
        assert!(TargetKind::Process.is_allowed(Action::Info));
        assert!(!TargetKind::Process.is_allowed(Action::Remove));
        assert!(!TargetKind::AllProcesses.is_allowed(Action::Remove));
        assert!(!TargetKind::Group.is_allowed(Action::Info));
    }

    #[test]
    fn every_kind_has_a_table_entry() {
        for kind in TargetKind::variants() {
            assert!(!kind.allowed_actions().is_empty(), "{kind} has no actions");
        }
    }

    #[test]
    fn name_requirement() {
        assert!(TargetKind::Group.requires_name());
        assert!(TargetKind::Process.requires_name());
        assert!(!TargetKind::AllProcesses.requires_name());
    }

    #[test]
    fn cells_follow_header_order() {
        let info = sample_info("web_1", "web");
        assert_eq!(
            info.cells(),
            vec!["4242", "web_1", "web", "RUNNING", "1700000000", "0", "20"]
        );
        assert_eq!(info.column("unknown"), None);
    }

    #[test]
    fn display_round_trips_tokens() {
        assert_eq!(TargetKind::AllProcesses.to_string(), "allProcesses");
        assert_eq!(Action::Remove.to_string(), "remove");
    }
}
