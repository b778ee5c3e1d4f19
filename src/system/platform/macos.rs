use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn process_nice(pid: u32) -> Option<i32> {
        // getpriority returns -1 on error, but -1 is also a valid nice value
        unsafe { *libc::__error() = 0 };
        let prio = unsafe { libc::getpriority(libc::PRIO_PROCESS, pid as libc::id_t) };
        let errno = unsafe { *libc::__error() };
        if prio == -1 && errno != 0 {
            None
        } else {
            Some(prio)
        }
    }

    fn open_in_viewer(path: &Path) -> io::Result<()> {
        Command::new("open")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}
