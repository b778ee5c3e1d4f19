use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use procflow::hierarchy::build_hierarchy;
use procflow::system::collector::Collector;
use procflow::system::table::ProcessTable;

fn spawn_long_lived_child() -> Child {
    #[cfg(windows)]
    let mut cmd = {
        let mut c = Command::new("powershell");
        c.args([
            "-NoProfile",
            "-NonInteractive",
            "-Command",
            "Start-Sleep -Seconds 30",
        ]);
        c
    };

    #[cfg(not(windows))]
    let mut cmd = {
        let mut c = Command::new("sh");
        c.args(["-c", "sleep 30"]);
        c
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn child process")
}

fn wait_for_listing(collector: &mut Collector, pid: u32, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if collector.processes().iter().any(|r| r.pid == pid) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(50));
    }
}

#[test]
fn spawned_child_is_listed_expanded_and_forgotten_after_exit() {
    let mut child = spawn_long_lived_child();
    let pid = child.id();
    let me = std::process::id();

    let mut collector = Collector::new();
    if !wait_for_listing(&mut collector, pid, Duration::from_secs(3)) {
        let _ = child.kill();
        panic!("child process PID {pid} was not observed before expansion");
    }

    let children = collector.children(me).unwrap_or_default();
    let record = collector.lookup(pid);

    let _ = child.kill();
    let _ = child.wait();

    assert!(children.contains(&pid), "{pid} missing from children of {me}");
    let record = record.expect("live child has details");
    assert_eq!(record.ppid, me);
    assert!(record.created_at > 0);

    assert!(collector.lookup(pid).is_none());
    assert!(collector.children(pid).is_none());
}

#[test]
fn own_name_builds_a_hierarchy_rooted_at_this_process() {
    let mut collector = Collector::new();
    let me = collector
        .lookup(std::process::id())
        .expect("own pid visible");
    let hierarchy = build_hierarchy(&mut collector, &me.name);
    assert!(hierarchy.roots().any(|pid| pid == me.pid));
}

const PF_KTHREAD: u64 = 0x0020_0000;

/// Pids under `/proc` whose stat flags mark them as kernel threads.
fn proc_kernel_threads() -> Vec<u32> {
    let Ok(entries) = std::fs::read_dir("/proc") else {
        return Vec::new();
    };
    let mut pids: Vec<u32> = entries
        .flatten()
        .filter_map(|e| e.file_name().to_str()?.parse::<u32>().ok())
        .filter(|pid| {
            let Ok(stat) = std::fs::read_to_string(format!("/proc/{pid}/stat")) else {
                return false;
            };
            let Some(close) = stat.rfind(')') else {
                return false;
            };
            // after comm: state(0) ppid(1) pgrp(2) session(3) tty_nr(4) tpgid(5) flags(6)
            stat[close + 1..]
                .split_whitespace()
                .nth(6)
                .and_then(|f| f.parse::<u64>().ok())
                .is_some_and(|flags| flags & PF_KTHREAD != 0)
        })
        .collect();
    pids.sort_unstable();
    pids
}

#[test]
fn kernel_threads_are_listed_and_expandable() {
    let kthreads = proc_kernel_threads();
    // no procfs, or a pid namespace without kernel threads
    let Some(&first) = kthreads.first() else {
        return;
    };

    let mut collector = Collector::new();
    let records = collector.processes();
    let record = records
        .iter()
        .find(|r| r.pid == first)
        .unwrap_or_else(|| panic!("kernel thread {first} missing from snapshot"));

    let hierarchy = build_hierarchy(&mut collector, &record.name);
    assert!(hierarchy.roots().any(|pid| pid == first));
}
