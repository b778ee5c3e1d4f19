use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use super::PlatformExtensions;

pub struct Platform;

use windows_sys::Win32::{
    Foundation::CloseHandle,
    System::Threading::{GetPriorityClass, OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION},
};

impl PlatformExtensions for Platform {
    // Windows has no nice value; report the priority class instead.
    fn process_nice(pid: u32) -> Option<i32> {
        unsafe {
            let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid);
            if handle.is_null() {
                return None;
            }
            let prio = GetPriorityClass(handle);
            CloseHandle(handle);
            if prio == 0 { None } else { Some(prio as i32) }
        }
    }

    fn open_in_viewer(path: &Path) -> io::Result<()> {
        Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}
