//! Remote supervisor access.
//!
//! SupervisorClient -> call contract the command engine depends on.
//! RemoteError      -> every failure a remote call can report.
//! XmlRpcClient     -> supervisord XML-RPC adapter (HTTP + basic auth).
//!
use thiserror::Error;

use crate::cmd::model::ProcessInfo;

pub mod codec;
pub mod xmlrpc;

pub use xmlrpc::XmlRpcClient;

/// Failures surfaced by a remote call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RemoteError {
    /// The daemon answered with an XML-RPC fault.
    #[error("{message} (fault {code})")]
    Fault { code: i64, message: String },

    /// The daemon could not be reached or the exchange broke off.
    #[error("supervisor unreachable: {0}")]
    Transport(String),

    /// The HTTP layer answered with something other than 200.
    #[error("supervisor replied with HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// The response body was not a usable XML-RPC document.
    #[error("malformed supervisor response: {0}")]
    Malformed(String),

    /// A group or all-process call reported per-process failures.
    #[error("some processes failed: {}", .0.join("; "))]
    ProcessFailures(Vec<String>),
}

/// Lifecycle operations and info queries offered by a supervisor daemon.
///
/// Every method is one blocking remote call.
pub trait SupervisorClient {
    fn get_all_process_info(&self) -> Result<Vec<ProcessInfo>, RemoteError>;
    fn get_process_info(&self, name: &str) -> Result<ProcessInfo, RemoteError>;
    fn start_process(&self, name: &str) -> Result<(), RemoteError>;
    fn stop_process(&self, name: &str) -> Result<(), RemoteError>;
    fn start_process_group(&self, group: &str) -> Result<(), RemoteError>;
    fn stop_process_group(&self, group: &str) -> Result<(), RemoteError>;
    fn start_all_processes(&self) -> Result<(), RemoteError>;
    fn stop_all_processes(&self) -> Result<(), RemoteError>;
}
