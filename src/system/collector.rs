use sysinfo::{
    Pid, Process, ProcessRefreshKind, ProcessesToUpdate, System, ThreadKind, UpdateKind, Users,
};

use super::platform;
use super::process::ProcessRecord;
use super::table::ProcessTable;

/// Live process table backed by sysinfo.
pub struct Collector {
    sys: System,
    users: Users,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

fn detail_refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::nothing()
        .with_cmd(UpdateKind::OnlyIfNotSet)
        .with_user(UpdateKind::OnlyIfNotSet)
}

impl Collector {
    pub fn new() -> Self {
        Collector {
            sys: System::new(),
            users: Users::new_with_refreshed_list(),
        }
    }

    fn refresh_all(&mut self) {
        tracing::debug!("refreshing full process list");
        self.sys
            .refresh_processes_specifics(ProcessesToUpdate::All, true, detail_refresh_kind());
        self.users.refresh();
    }

    /// Re-reads a single pid, dropping it from the cache if it has exited.
    fn refresh_one(&mut self, pid: u32) -> Option<&Process> {
        let sys_pid = Pid::from_u32(pid);
        let pids = [sys_pid];
        self.sys
            .refresh_processes_specifics(ProcessesToUpdate::Some(&pids), true, detail_refresh_kind());
        self.sys.process(sys_pid)
    }

    fn record_for(&self, pid: Pid, process: &Process) -> ProcessRecord {
        let pid_u32 = pid.as_u32();
        let command_line = process
            .cmd()
            .iter()
            .map(|s| s.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let username = process
            .user_id()
            .and_then(|uid| self.users.get_user_by_id(uid))
            .map(|user| user.name().to_string());

        ProcessRecord {
            pid: pid_u32,
            ppid: process.parent().map(|p| p.as_u32()).unwrap_or(0),
            name: process.name().to_string_lossy().to_string(),
            command_line,
            // sysinfo already truncates to whole seconds
            created_at: process.start_time(),
            priority: platform::process_nice(pid_u32),
            username,
        }
    }
}

// sysinfo lists userland threads next to processes on some platforms.
// Kernel threads (kthreadd, kworker/*) are real table entries and stay.
fn is_thread(process: &Process) -> bool {
    matches!(process.thread_kind(), Some(ThreadKind::Userland))
}

impl ProcessTable for Collector {
    fn processes(&mut self) -> Vec<ProcessRecord> {
        self.refresh_all();
        let mut records: Vec<ProcessRecord> = self
            .sys
            .processes()
            .iter()
            .filter(|(_, process)| !is_thread(process))
            .map(|(pid, process)| self.record_for(*pid, process))
            .collect();
        records.sort_by_key(|r| r.pid);
        tracing::debug!(count = records.len(), "process snapshot taken");
        records
    }

    fn children(&mut self, pid: u32) -> Option<Vec<u32>> {
        self.refresh_one(pid)?;
        let parent = Pid::from_u32(pid);
        let mut children: Vec<u32> = self
            .sys
            .processes()
            .iter()
            .filter(|(child, process)| {
                **child != parent && process.parent() == Some(parent) && !is_thread(process)
            })
            .map(|(child, _)| child.as_u32())
            .collect();
        children.sort_unstable();
        Some(children)
    }

    fn lookup(&mut self, pid: u32) -> Option<ProcessRecord> {
        let sys_pid = Pid::from_u32(pid);
        self.refresh_one(pid)?;
        let process = self.sys.process(sys_pid)?;
        Some(self.record_for(sys_pid, process))
    }
}
