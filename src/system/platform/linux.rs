use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn process_nice(pid: u32) -> Option<i32> {
        let path = format!("/proc/{pid}/stat");
        let contents = std::fs::read_to_string(path).ok()?;
        // comm field may contain spaces and parens, so find the closing )
        let after_comm = contents.rfind(')')? + 1;
        let fields: Vec<&str> = contents[after_comm..].split_whitespace().collect();
        // Fields after comm: state(0) ppid(1) pgrp(2) session(3) tty_nr(4)
        // tpgid(5) flags(6) minflt(7) cminflt(8) majflt(9) cmajflt(10)
        // utime(11) stime(12) cutime(13) cstime(14) priority(15) nice(16)
        fields.get(16)?.parse().ok()
    }

    fn open_in_viewer(path: &Path) -> io::Result<()> {
        Command::new("xdg-open")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}
