//! Test double for `SupervisorClient`: records calls as `method(arg)` and
//! fails the call named by `failing_on`.
use std::cell::RefCell;

use super::model::ProcessInfo;
use crate::rpc::{RemoteError, SupervisorClient};

pub struct RecordingClient {
    inventory: Vec<ProcessInfo>,
    fail_on: Option<String>,
    calls: RefCell<Vec<String>>,
}

impl RecordingClient {
    pub fn new(inventory: Vec<ProcessInfo>) -> Self {
        Self {
            inventory,
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, call: &str) -> Self {
        self.fail_on = Some(call.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, method: &str, arg: Option<&str>) -> Result<(), RemoteError> {
        let call = match arg {
            Some(a) => format!("{method}({a})"),
            None => method.to_string(),
        };
        let fails = self.fail_on.as_deref() == Some(call.as_str());
        self.calls.borrow_mut().push(call);
        if fails {
            return Err(RemoteError::Fault {
                code: 10,
                message: format!("BAD_NAME: {}", arg.unwrap_or(method)),
            });
        }
        Ok(())
    }
}

impl SupervisorClient for RecordingClient {
    fn get_all_process_info(&self) -> Result<Vec<ProcessInfo>, RemoteError> {
        self.record("getAllProcessInfo", None)?;
        Ok(self.inventory.clone())
    }

    fn get_process_info(&self, name: &str) -> Result<ProcessInfo, RemoteError> {
        self.record("getProcessInfo", Some(name))?;
        self.inventory
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| RemoteError::Fault {
                code: 10,
                message: format!("BAD_NAME: {name}"),
            })
    }

    fn start_process(&self, name: &str) -> Result<(), RemoteError> {
        self.record("startProcess", Some(name))
    }

    fn stop_process(&self, name: &str) -> Result<(), RemoteError> {
        self.record("stopProcess", Some(name))
    }

    fn start_process_group(&self, group: &str) -> Result<(), RemoteError> {
        self.record("startProcessGroup", Some(group))
    }

    fn stop_process_group(&self, group: &str) -> Result<(), RemoteError> {
        self.record("stopProcessGroup", Some(group))
    }

    fn start_all_processes(&self) -> Result<(), RemoteError> {
        self.record("startAllProcesses", None)
    }

    fn stop_all_processes(&self) -> Result<(), RemoteError> {
        self.record("stopAllProcesses", None)
    }
}
