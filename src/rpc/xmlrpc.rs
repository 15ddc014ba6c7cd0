//! supervisord XML-RPC adapter.
//!
//! Each `SupervisorClient` method is one `supervisor.*` call POSTed to
//! `http://<host>:<port>/RPC2`. The client owns a Tokio runtime and blocks
//! on every request, so callers stay synchronous.
use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::runtime::Runtime;
use url::Url;

use super::codec::{Value, decode_response, encode_call};
use super::{RemoteError, SupervisorClient};
use crate::cmd::model::ProcessInfo;
use crate::config::ConnectionConfig;

/// Per-process status code reported by group and all-process calls.
const STATUS_SUCCESS: i64 = 80;

/// Per-process result of a group / all-process start or stop.
#[derive(Debug, Clone, Deserialize)]
struct CallStatus {
    name: String,
    group: String,
    status: i64,
    #[serde(default)]
    description: String,
}

pub struct XmlRpcClient {
    endpoint: Url,
    username: Option<String>,
    password: Option<String>,
    http: reqwest::Client,
    rt: Runtime,
}

impl std::fmt::Debug for XmlRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlRpcClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl XmlRpcClient {
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        let rt = Runtime::new().context("Failed to create Tokio runtime")?;
        Ok(Self {
            endpoint,
            username: config.username.clone(),
            password: config.password.clone(),
            http,
            rt,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn call(&self, method: &str, params: &[Value]) -> Result<Value, RemoteError> {
        log::trace!("xml-rpc call {method} -> {}", self.endpoint);
        let body = encode_call(method, params);
        let raw = self.rt.block_on(self.post(body))?;
        decode_response(&raw)
    }

    fn call_typed<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[Value],
    ) -> Result<T, RemoteError> {
        let value = self.call(method, params)?;
        serde_json::from_value(serde_json::Value::from(value))
            .map_err(|e| RemoteError::Malformed(format!("{method}: {e}")))
    }

    /// Run a start/stop call that answers with per-process statuses.
    fn call_checked(&self, method: &str, params: &[Value]) -> Result<(), RemoteError> {
        let statuses: Vec<CallStatus> = self.call_typed(method, params)?;
        let failures: Vec<String> = statuses
            .iter()
            .filter(|s| s.status != STATUS_SUCCESS)
            .map(|s| {
                if s.description.is_empty() {
                    format!("{}:{} (status {})", s.group, s.name, s.status)
                } else {
                    format!("{}:{} ({})", s.group, s.name, s.description)
                }
            })
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            log::warn!("{method}: {} process(es) failed", failures.len());
            Err(RemoteError::ProcessFailures(failures))
        }
    }

    async fn post(&self, body: String) -> Result<String, RemoteError> {
        let mut request = self
            .http
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .body(body);
        if let Some(user) = &self.username {
            request = request.basic_auth(user, self.password.as_deref());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::Transport(format!("request to {} timed out", self.endpoint))
            } else {
                RemoteError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))
    }
}

impl SupervisorClient for XmlRpcClient {
    fn get_all_process_info(&self) -> Result<Vec<ProcessInfo>, RemoteError> {
        self.call_typed("supervisor.getAllProcessInfo", &[])
    }

    fn get_process_info(&self, name: &str) -> Result<ProcessInfo, RemoteError> {
        self.call_typed(
            "supervisor.getProcessInfo",
            &[Value::String(name.to_string())],
        )
    }

    fn start_process(&self, name: &str) -> Result<(), RemoteError> {
        self.call(
            "supervisor.startProcess",
            &[Value::String(name.to_string()), Value::Bool(true)],
        )
        .map(|_| ())
    }

    fn stop_process(&self, name: &str) -> Result<(), RemoteError> {
        self.call(
            "supervisor.stopProcess",
            &[Value::String(name.to_string()), Value::Bool(true)],
        )
        .map(|_| ())
    }

    fn start_process_group(&self, group: &str) -> Result<(), RemoteError> {
        self.call_checked(
            "supervisor.startProcessGroup",
            &[Value::String(group.to_string()), Value::Bool(true)],
        )
    }

    fn stop_process_group(&self, group: &str) -> Result<(), RemoteError> {
        self.call_checked(
            "supervisor.stopProcessGroup",
            &[Value::String(group.to_string()), Value::Bool(true)],
        )
    }

    fn start_all_processes(&self) -> Result<(), RemoteError> {
        self.call_checked("supervisor.startAllProcesses", &[Value::Bool(true)])
    }

    fn stop_all_processes(&self) -> Result<(), RemoteError> {
        self.call_checked("supervisor.stopAllProcesses", &[Value::Bool(true)])
    }
}
