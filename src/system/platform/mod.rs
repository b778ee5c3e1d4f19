use std::io;
use std::path::Path;

pub trait PlatformExtensions {
    /// Scheduling priority as a nice value, `None` if unreadable.
    fn process_nice(pid: u32) -> Option<i32>;
    /// Hand a file to the desktop's default viewer without waiting for it.
    fn open_in_viewer(path: &Path) -> io::Result<()>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn process_nice(pid: u32) -> Option<i32> {
    platform_impl::Platform::process_nice(pid)
}

pub fn open_in_viewer(path: &Path) -> io::Result<()> {
    platform_impl::Platform::open_in_viewer(path)
}
