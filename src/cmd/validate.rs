/*!
`validate.rs`

Turns raw CLI tokens into a `CommandRequest`, checking in a fixed order:

  1. target kind is known             -> UnknownTargetKind
  2. action is legal for that kind    -> UnknownActionForKind
  3. named kinds carry a name         -> MissingName
  4. group names exist on the daemon  -> UnknownGroup

Checks 1-3 need no daemon state (`parse_request`). Check 4 runs against
the current process inventory (`check_target`). The first failure wins.

Process names are not checked here; an unknown process is reported by
the daemon when the call is made.
*/

use std::collections::BTreeSet;
use thiserror::Error;

use super::model::{Action, CommandRequest, ProcessInfo, Target, TargetKind};

/// Local validation failures. None of them involve a remote side effect.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("\"{0}\" is not a valid object.")]
    UnknownTargetKind(String),

    #[error("\"{action}\" is not a valid action for object \"{kind}\".")]
    UnknownActionForKind { kind: TargetKind, action: String },

    #[error("Object \"{0}\" requires a name.")]
    MissingName(TargetKind),

    #[error("Group \"{0}\" does not exist.")]
    UnknownGroup(String),
}

/// Checks that need no daemon state: kind, action-for-kind, name presence.
pub fn parse_request(
    kind_raw: &str,
    action_raw: &str,
    name_raw: Option<&str>,
) -> Result<CommandRequest, ValidationError> {
    let kind = TargetKind::parse(kind_raw)
        .ok_or_else(|| ValidationError::UnknownTargetKind(kind_raw.to_string()))?;

    let action = Action::parse(action_raw)
        .filter(|action| kind.is_allowed(*action))
        .ok_or_else(|| ValidationError::UnknownActionForKind {
            kind,
            action: action_raw.to_string(),
        })?;

    let name = match name_raw.map(str::trim).filter(|n| !n.is_empty()) {
        None if kind.requires_name() => return Err(ValidationError::MissingName(kind)),
        name => name,
    };
    let target = match (kind, name) {
        (TargetKind::Group, Some(name)) => Target::Group(name.to_string()),
        (TargetKind::Process, Some(name)) => Target::Process(name.to_string()),
        _ => Target::AllProcesses,
    };

    Ok(CommandRequest::new(target, action))
}

/// Whether `check_target` needs the daemon's process inventory.
pub fn needs_inventory(req: &CommandRequest) -> bool {
    matches!(req.target(), Target::Group(_))
}

/// Distinct group names across the inventory.
pub fn known_groups(current_info: &[ProcessInfo]) -> BTreeSet<&str> {
    current_info.iter().map(|p| p.group.as_str()).collect()
}

/// Existence check against the daemon's current state (groups only).
pub fn check_target(
    req: &CommandRequest,
    current_info: &[ProcessInfo],
) -> Result<(), ValidationError> {
    match req.target() {
        Target::Group(name) if !known_groups(current_info).contains(name.as_str()) => {
            Err(ValidationError::UnknownGroup(name.clone()))
        }
        _ => Ok(()),
    }
}

/// Full validation against an already fetched inventory.
#[cfg(test)]
fn validate(
    kind_raw: &str,
    action_raw: &str,
    name_raw: Option<&str>,
    current_info: &[ProcessInfo],
) -> Result<CommandRequest, ValidationError> {
    let req = parse_request(kind_raw, action_raw, name_raw)?;
    check_target(&req, current_info)?;
    Ok(req)
}
