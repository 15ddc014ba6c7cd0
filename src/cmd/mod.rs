/*!
Command engine for `supervisor-cli`.

Layout (leaf-first):
  src/cmd/
    mod.rs          (this file: module declarations + re-exports)
    model.rs        (TargetKind / Action / ACTION_TABLE / CommandRequest / ProcessInfo)
    validate.rs     (raw tokens -> CommandRequest, first violation wins)
    dispatch.rs     (CommandRequest -> ordered Steps -> CommandOutcome)
    report.rs       (CommandOutcome -> OutputRecords)
    supervisor.rs   (SupervisorArgs + run / execute_supervisor facade)
    format.rs       (human rendering of OutputRecords)

Conventions:
  - The engine only sees `crate::rpc::SupervisorClient`; transports live in `rpc`.
  - Each subcommand module exposes one public `execute_*` function used by main.rs.
  - Legality lives in `model::ACTION_TABLE`; nothing else re-encodes it.
*/

pub mod dispatch;
pub mod format;
pub mod model;
pub mod report;
pub mod supervisor;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use supervisor::{SupervisorArgs, execute_supervisor};
