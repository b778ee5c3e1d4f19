use serde::Serialize;

/// One process as seen by a single snapshot of the OS process table.
///
/// Fields the OS refuses to reveal (permissions, races with exit) are left
/// empty rather than failing the whole snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub ppid: u32,
    pub name: String,
    pub command_line: String,
    /// Creation time in whole seconds since the UNIX epoch. Sub-second
    /// precision is truncated, so the `Elevation` field never carries a
    /// fractional part.
    pub created_at: u64,
    /// Nice value.
    pub priority: Option<i32>,
    pub username: Option<String>,
}

impl ProcessRecord {
    pub fn username_or_empty(&self) -> &str {
        self.username.as_deref().unwrap_or("")
    }

    pub fn priority_or_empty(&self) -> String {
        self.priority.map(|p| p.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(username: Option<&str>, priority: Option<i32>) -> ProcessRecord {
        ProcessRecord {
            pid: 1,
            ppid: 0,
            name: "init".into(),
            command_line: String::new(),
            created_at: 0,
            priority,
            username: username.map(str::to_string),
        }
    }

    #[test]
    fn missing_fields_render_empty() {
        let r = record(None, None);
        assert_eq!(r.username_or_empty(), "");
        assert_eq!(r.priority_or_empty(), "");
    }

    #[test]
    fn present_fields_render_verbatim() {
        let r = record(Some("root"), Some(-5));
        assert_eq!(r.username_or_empty(), "root");
        assert_eq!(r.priority_or_empty(), "-5");
    }
}
