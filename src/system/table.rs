use std::collections::HashSet;

use super::process::ProcessRecord;

/// Read access to a live process table.
///
/// `children` and `lookup` re-check the process against the OS, so a pid that
/// was listed by `processes` may already be gone by the time it is expanded.
/// Both return `None` in that case.
pub trait ProcessTable {
    /// Fresh snapshot of every visible process, ordered by pid.
    fn processes(&mut self) -> Vec<ProcessRecord>;

    /// Direct children of `pid` in enumeration order.
    fn children(&mut self, pid: u32) -> Option<Vec<u32>>;

    /// Current details of `pid`.
    fn lookup(&mut self, pid: u32) -> Option<ProcessRecord>;
}

impl<T: ProcessTable + ?Sized> ProcessTable for Box<T> {
    fn processes(&mut self) -> Vec<ProcessRecord> {
        (**self).processes()
    }

    fn children(&mut self, pid: u32) -> Option<Vec<u32>> {
        (**self).children(pid)
    }

    fn lookup(&mut self, pid: u32) -> Option<ProcessRecord> {
        (**self).lookup(pid)
    }
}

/// In-memory process table built from fixed records.
///
/// Pids marked with [`StaticProcessTable::exit_after_scan`] still show up in
/// `processes()` but behave as exited for `children()` and `lookup()`.
#[derive(Clone, Debug, Default)]
pub struct StaticProcessTable {
    records: Vec<ProcessRecord>,
    exited: HashSet<u32>,
}

impl StaticProcessTable {
    pub fn new(mut records: Vec<ProcessRecord>) -> Self {
        records.sort_by_key(|r| r.pid);
        Self {
            records,
            exited: HashSet::new(),
        }
    }

    pub fn exit_after_scan(mut self, pid: u32) -> Self {
        self.exited.insert(pid);
        self
    }

    fn is_live(&self, pid: u32) -> bool {
        !self.exited.contains(&pid) && self.records.iter().any(|r| r.pid == pid)
    }
}

impl ProcessTable for StaticProcessTable {
    fn processes(&mut self) -> Vec<ProcessRecord> {
        self.records.clone()
    }

    fn children(&mut self, pid: u32) -> Option<Vec<u32>> {
        if !self.is_live(pid) {
            return None;
        }
        Some(
            self.records
                .iter()
                .filter(|r| r.ppid == pid && r.pid != pid)
                .map(|r| r.pid)
                .collect(),
        )
    }

    fn lookup(&mut self, pid: u32) -> Option<ProcessRecord> {
        if self.exited.contains(&pid) {
            return None;
        }
        self.records.iter().find(|r| r.pid == pid).cloned()
    }
}
