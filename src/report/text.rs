use std::fmt::Write;

use crate::system::process::ProcessRecord;

/// Renders the details file: one block per root, blank line after each.
pub fn render_details<'a>(records: impl IntoIterator<Item = &'a ProcessRecord>) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(out, "PID: {}", record.pid);
        let _ = writeln!(out, "Username: {}", record.username_or_empty());
        let _ = writeln!(out, "Command Line: {}", record.command_line);
        let _ = writeln!(out, "Elevation: {}", record.created_at);
        let _ = writeln!(out, "PPID: {}", record.ppid);
        let _ = writeln!(out, "Base Priority: {}", record.priority_or_empty());
        let _ = writeln!(out);
    }
    out
}
